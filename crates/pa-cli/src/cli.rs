//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Render page attachment templates
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a template against pages and attachments loaded from a fixture
    Render {
        /// JSON file with `pages`, `users` and `attachments`
        #[arg(short, long)]
        fixture: PathBuf,

        /// Page to render (default: the first page in the fixture)
        #[arg(short, long)]
        page: Option<i64>,

        /// Template file, or `-` to read standard input
        template: PathBuf,
    },

    /// List the available tags
    Tags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "pa-cli", "render", "--fixture", "site.json", "--page", "3", "-",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                fixture,
                page,
                template,
            } => {
                assert_eq!(fixture, PathBuf::from("site.json"));
                assert_eq!(page, Some(3));
                assert_eq!(template, PathBuf::from("-"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_render_requires_fixture() {
        assert!(Cli::try_parse_from(["pa-cli", "render", "page.html"]).is_err());
    }
}
