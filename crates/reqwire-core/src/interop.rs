//! Conversion into `http` crate types

use crate::request::{Request, Version};
use crate::Error;
use bytes::Bytes;

/// Fails with [`Error::Conversion`] when the method or the version was not
/// recognized, or when a header is not valid for the `http` types.
impl TryFrom<Request> for http::Request<Bytes> {
    type Error = Error;

    fn try_from(req: Request) -> Result<Self, Error> {
        let method = req
            .method
            .ok_or_else(|| Error::Conversion("unrecognized method".to_string()))?;
        let uri = req
            .url()
            .ok_or_else(|| Error::Conversion("missing request target".to_string()))?;

        let version = http_version(req.version)
            .ok_or_else(|| Error::Conversion("unrecognized HTTP version".to_string()))?;

        let mut builder = http::Request::builder()
            .method(method.as_str())
            .uri(uri)
            .version(version);

        // Copy headers
        for header in &req.headers {
            builder = builder.header(header.key.as_str(), header.value.as_str());
        }

        builder
            .body(req.body)
            .map_err(|e| Error::Conversion(e.to_string()))
    }
}

fn http_version(version: Version) -> Option<http::Version> {
    match version {
        Version::Http11 => Some(http::Version::HTTP_11),
        Version::Http2 => Some(http::Version::HTTP_2),
        Version::Http3 => Some(http::Version::HTTP_3),
        Version::Unknown => None,
    }
}
