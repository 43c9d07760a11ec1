pub mod dmidecode;
pub mod lscpu;
pub mod nvidia;
