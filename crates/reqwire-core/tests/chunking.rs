//! Property tests: the assembled record must not depend on how the input
//! was split across `feed` calls.

use proptest::prelude::*;
use reqwire_core::{Parser, ParserConfig, Request, Status};

// ========================================
// Strategies
// ========================================

fn method() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("GET"),
        Just("POST"),
        Just("PUT"),
        Just("DELETE"),
        Just("HEAD"),
        Just("OPTIONS"),
        Just("PATCH"),
    ]
}

fn path() -> impl Strategy<Value = String> {
    "/[a-zA-Z0-9/_.-]{0,24}"
}

// `?` and `=` included so later question marks land in the search
fn search() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z0-9=&?%+]{0,24}")
}

// Prefixed so generated names never collide with framing headers
fn header_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9-]{1,12}".prop_map(|s| format!("X-{s}"))
}

// No leading or trailing whitespace, which the tokenizer strips
fn header_value() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[!-~]([ -~]{0,30}[!-~])?"]
}

fn headers() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((header_name(), header_value()), 0..8)
}

fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..128)
}

#[derive(Debug, Clone)]
struct Message {
    method: &'static str,
    path: String,
    search: Option<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Message {
    fn target(&self) -> String {
        match &self.search {
            Some(search) => format!("{}?{}", self.path, search),
            None => self.path.clone(),
        }
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = format!("{} {} HTTP/1.1\r\n", self.method, self.target()).into_bytes();
        for (name, value) in &self.headers {
            out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        if !self.body.is_empty() {
            out.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }

    fn encode_chunked(&self, chunk: usize) -> Vec<u8> {
        let mut out = format!("{} {} HTTP/1.1\r\n", self.method, self.target()).into_bytes();
        for (name, value) in &self.headers {
            out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        out.extend_from_slice(b"Transfer-Encoding: chunked\r\n\r\n");
        for piece in self.body.chunks(chunk.max(1)) {
            out.extend_from_slice(format!("{:x}\r\n", piece.len()).as_bytes());
            out.extend_from_slice(piece);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"0\r\n\r\n");
        out
    }
}

fn message() -> impl Strategy<Value = Message> {
    (method(), path(), search(), headers(), body()).prop_map(
        |(method, path, search, headers, body)| Message {
            method,
            path,
            search,
            headers,
            body,
        },
    )
}

fn parser() -> Parser {
    Parser::with_config(ParserConfig::new().quiet())
}

/// Feed `input` cut at the given offsets and return the finished record
fn parse_split(parser: &mut Parser, input: &[u8], cuts: &[usize]) -> Request {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (input.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut start = 0;
    let mut status = Status::NeedsMore;
    for end in points.into_iter().chain(std::iter::once(input.len())) {
        status = parser.feed(&input[start..end]).unwrap();
        start = end;
    }
    assert_eq!(status, Status::Complete);
    parser.take_request().unwrap()
}

fn parse_whole(input: &[u8]) -> Request {
    parse_split(&mut parser(), input, &[])
}

// ========================================
// Properties
// ========================================

proptest! {
    #[test]
    fn prop_split_points_do_not_matter(
        msg in message(),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let input = msg.encode();
        let whole = parse_whole(&input);
        let split = parse_split(&mut parser(), &input, &cuts);
        prop_assert_eq!(whole, split);
    }

    #[test]
    fn prop_byte_at_a_time(msg in message()) {
        let input = msg.encode();
        let cuts: Vec<usize> = (0..input.len()).collect();
        let split = parse_split(&mut parser(), &input, &cuts);
        prop_assert_eq!(parse_whole(&input), split);
    }

    #[test]
    fn prop_target_splits_at_first_question_mark(
        msg in message(),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let req = parse_split(&mut parser(), &msg.encode(), &cuts);
        prop_assert_eq!(req.path.as_deref(), Some(msg.path.as_str()));
        prop_assert_eq!(req.search.as_deref(), Some(msg.search.as_deref().unwrap_or("")));

        let expected_url = match msg.search.as_deref() {
            None | Some("") => msg.path.clone(),
            Some(_) => msg.target(),
        };
        prop_assert_eq!(req.url(), Some(expected_url));
    }

    #[test]
    fn prop_headers_kept_in_order(
        msg in message(),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let req = parse_split(&mut parser(), &msg.encode(), &cuts);
        let mut parsed: Vec<(String, String)> = req
            .headers
            .iter()
            .map(|h| (h.key.clone(), h.value.clone()))
            .collect();
        if !msg.body.is_empty() {
            let framing = parsed.pop().unwrap();
            prop_assert_eq!(framing.0.as_str(), "Content-Length");
        }
        prop_assert_eq!(parsed, msg.headers.clone());

        for (name, _) in &msg.headers {
            let expected: Vec<&str> = msg
                .headers
                .iter()
                .filter(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
                .collect();
            prop_assert_eq!(req.all_headers(name), expected.clone());
            prop_assert_eq!(req.first_header(name), expected.first().copied());
        }
    }

    #[test]
    fn prop_chunked_body_matches_length_delimited(
        msg in message(),
        chunk in 1usize..32,
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let req = parse_split(&mut parser(), &msg.encode_chunked(chunk), &cuts);
        prop_assert_eq!(&req.body[..], &msg.body[..]);
        prop_assert_eq!(req.path, parse_whole(&msg.encode()).path);
    }

    #[test]
    fn prop_parser_reuse_matches_fresh_parser(
        first in message(),
        second in message(),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let mut reused = parser();
        parse_split(&mut reused, &first.encode(), &cuts);
        let again = parse_split(&mut reused, &second.encode(), &cuts);
        prop_assert_eq!(again, parse_whole(&second.encode()));
    }
}
