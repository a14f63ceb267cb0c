//! Precomputed sample tables for the transcendental kernel
//!
//! Each table holds `2^DEGREE + 1` raw Q8.24 samples of a function at
//! evenly spaced points on [1, 2], endpoints included. Values are
//! `round(f(1 + i/64) * 2^24)`.

/// Number of index bits taken from the fractional part of x
pub const TABLE_DEGREE: u32 = 6;

/// Number of samples in each table
pub const TABLE_LEN: usize = (1 << TABLE_DEGREE) + 1;

/// log2(x) for x in [1, 2]
pub static LOG2_TABLE: [i32; TABLE_LEN] = [
    0, 375270, 744810, 1108793, 1467383, 1820738, 2169009, 2512340,
    2850868, 3184728, 3514044, 3838941, 4159533, 4475935, 4788255, 5096595,
    5401057, 5701737, 5998727, 6292118, 6581994, 6868440, 7151536, 7431359,
    7707984, 7981483, 8251926, 8519380, 8783912, 9045584, 9304457, 9560591,
    9814042, 10064867, 10313120, 10558852, 10802114, 11042956, 11281425, 11517568,
    11751428, 11983051, 12212479, 12439752, 12664911, 12887994, 13109041, 13328087,
    13545168, 13760320, 13973576, 14184969, 14394532, 14602297, 14808293, 15012551,
    15215099, 15415967, 15615181, 15812769, 16008758, 16203172, 16396036, 16587377,
    16777216,
];

/// 2^x for x in [1, 2]
pub static EXP2_TABLE: [i32; TABLE_LEN] = [
    33554432, 33919816, 34289178, 34662563, 35040014, 35421574, 35807290, 36197206,
    36591368, 36989821, 37392614, 37799793, 38211406, 38627501, 39048127, 39473333,
    39903169, 40337686, 40776935, 41220967, 41669834, 42123588, 42582284, 43045975,
    43514715, 43988559, 44467563, 44951783, 45441276, 45936099, 46436310, 46941968,
    47453133, 47969864, 48492221, 49020267, 49554062, 50093671, 50639155, 51190579,
    51748008, 52311507, 52881142, 53456980, 54039088, 54627535, 55222390, 55823723,
    56431603, 57046103, 57667294, 58295250, 58930044, 59571750, 60220444, 60876201,
    61539100, 62209216, 62886630, 63571421, 64263668, 64963454, 65670859, 66385968,
    67108864,
];
