pub mod decode;
pub mod encode;
pub mod pages;
pub mod replay;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Serialize filter values into a query string
    Encode(encode::EncodeArgs),
    /// Extract tracked filter values from a query string
    Decode(decode::DecodeArgs),
    /// Replay a navigation script against a page
    Replay(replay::ReplayArgs),
    /// List configured pages
    Pages(pages::PagesArgs),
}
