pub mod archive;
pub mod http;

pub use archive::Bzip2TarExtractor;
pub use http::HttpArchiveSource;
