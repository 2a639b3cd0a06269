pub mod direct_downloader;
pub mod error;
pub mod ffmpeg;
pub mod filename;
pub mod http_client;
pub mod process;
pub mod progress;
pub mod redirect;
pub mod url_parser;
