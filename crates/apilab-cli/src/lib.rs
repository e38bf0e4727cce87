use clap::ValueEnum;

pub mod commands;
pub mod refresh;
pub mod workspace;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}
