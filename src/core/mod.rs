pub mod deploy;
pub mod pages;
pub mod stager;
pub mod workspace;
