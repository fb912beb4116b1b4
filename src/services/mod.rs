pub mod status_sink;
pub mod wiki_domain;

pub use status_sink::{CollectSink, ConsoleSink, SinkEvent, StatusSink};
pub use wiki_domain::{diff_url, hist_url, wiki_domain};
