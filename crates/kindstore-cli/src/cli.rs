use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kindstore",
    about = "Polymorphic object store over a key-value backend",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a few people and animals, then read them back
    Demo,
    /// Store a person
    PutPerson(PutPersonArgs),
    /// Store an animal
    PutAnimal(PutAnimalArgs),
    /// Fetch an object by id
    Get(IdArgs),
    /// Fetch the first object with a given name
    Find(FindArgs),
    /// List every object of a kind
    List(ListArgs),
    /// Delete an object by id
    Delete(IdArgs),
    /// Show the registered kinds
    Kinds,
}

#[derive(Args)]
pub struct PutPersonArgs {
    pub name: String,
    pub age: i32,
}

#[derive(Args)]
pub struct PutAnimalArgs {
    pub name: String,
    pub species: String,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct FindArgs {
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub kind: String,
}
