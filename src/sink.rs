//! Append-only destinations for extracted movies.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ScrapeError;
use crate::{MovieRecord, generate_rss};

/// Receives each movie as soon as it is extracted.
pub trait MovieSink {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError>;

    fn flush(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }
}

impl MovieSink for Vec<MovieRecord> {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError> {
        Vec::push(self, movie.clone());
        Ok(())
    }
}

impl<S: MovieSink + ?Sized> MovieSink for &mut S {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError> {
        (**self).push(movie)
    }

    fn flush(&mut self) -> Result<(), ScrapeError> {
        (**self).flush()
    }
}

impl<S: MovieSink> MovieSink for Option<S> {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError> {
        match self {
            Some(sink) => sink.push(movie),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), ScrapeError> {
        match self {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl<A: MovieSink, B: MovieSink> MovieSink for (A, B) {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError> {
        self.0.push(movie)?;
        self.1.push(movie)
    }

    fn flush(&mut self) -> Result<(), ScrapeError> {
        self.0.flush()?;
        self.1.flush()
    }
}

/// One JSON object per line, flushed after every record.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, ScrapeError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> MovieSink for JsonLinesSink<W> {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError> {
        serde_json::to_writer(&mut self.writer, movie)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ScrapeError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects movies and renders them as one RSS channel at the end of the crawl.
pub struct RssSink {
    channel_title: String,
    channel_link: String,
    movies: Vec<MovieRecord>,
}

impl RssSink {
    pub fn new(channel_title: impl Into<String>, channel_link: impl Into<String>) -> Self {
        Self {
            channel_title: channel_title.into(),
            channel_link: channel_link.into(),
            movies: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn render(&self) -> Result<String, ScrapeError> {
        let description = format!("{} titles from {}", self.movies.len(), self.channel_title);
        generate_rss(
            &self.movies,
            &self.channel_title,
            &self.channel_link,
            &description,
        )
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ScrapeError> {
        std::fs::write(path, self.render()?)?;
        Ok(())
    }
}

impl MovieSink for RssSink {
    fn push(&mut self, movie: &MovieRecord) -> Result<(), ScrapeError> {
        self.movies.push(movie.clone());
        Ok(())
    }
}
