pub mod generate;
pub mod init;

pub use generate::GenerateSummary;
