//! Test utilities: recording and failing sink doubles shared by the unit
//! suites.
