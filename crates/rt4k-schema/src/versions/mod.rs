//! Static schema data for each supported profile version.

pub mod v1_4_2;
