pub mod consts;
pub mod correct;
pub mod error;
pub mod histogram;
pub mod parallel;
pub mod pnm;
pub mod remap;
pub mod threshold;
