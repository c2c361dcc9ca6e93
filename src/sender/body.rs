//! Body streaming
//!
//! The source stream and the encoder are scoped to one call and dropped on
//! every exit path, including I/O failures mid-copy.

use super::evaluate::BodyMode;
use crate::error::Result;
use crate::http::ResponseSink;
use crate::resource::WebResource;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};

/// Stream the resource content into the sink; returns bytes read from the source
pub fn send_body<S>(
    resource: &dyn WebResource,
    mode: BodyMode,
    buffer_size: usize,
    sink: &mut S,
) -> Result<u64>
where
    S: ResponseSink + ?Sized,
{
    let copied = match mode {
        BodyMode::None => return Ok(0),
        BodyMode::Raw => {
            let mut source = resource.open_content()?;
            let out = sink.body_writer()?;
            let copied = copy(&mut source, out, buffer_size)?;
            out.flush()?;
            copied
        }
        BodyMode::Gzip => {
            let mut source = resource.open_content()?;
            let mut encoder = GzEncoder::new(sink.body_writer()?, Compression::default());
            let copied = copy(&mut source, &mut encoder, buffer_size)?;
            encoder.finish()?.flush()?;
            copied
        }
    };
    tracing::trace!(resource = resource.name(), copied, ?mode, "body sent");
    Ok(copied)
}

/// Copy in chunks of `buffer_size` until the source is exhausted
fn copy<R, W>(source: &mut R, sink: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; buffer_size];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_all(&buf[..n])?;
        total += n as u64;
    }
}
