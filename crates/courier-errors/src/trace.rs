//! Backtrace simplification for debug responses

use std::backtrace::{Backtrace, BacktraceStatus};

use crate::Frame;

/// Frames belonging to the capture machinery rather than the raise site
const CAPTURE_FRAMES: &[&str] = &["std::backtrace", "courier_core::raised::", "<courier_core::raised::"];

/// Reduce a captured backtrace to file/line/function frames
///
/// Returns an empty list when the platform could not capture a backtrace.
pub fn frames(backtrace: &Backtrace) -> Vec<Frame> {
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }

    parse(&backtrace.to_string())
}

/// Parse the standard library's rendered backtrace:
///
/// ```text
///    3: courier_server::api::orders::show
///              at ./crates/courier-server/src/api/orders.rs:41:9
/// ```
fn parse(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Option<Frame>> = Vec::new();

    for line in rendered.lines().map(str::trim) {
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(Some(frame)) = frames.last_mut()
                && frame.file.is_none()
            {
                let (file, line) = split_location(location);
                frame.file = Some(file.to_owned());
                frame.line = line;
            }
            continue;
        }

        let Some((index, symbol)) = line.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        if CAPTURE_FRAMES.iter().any(|prefix| symbol.starts_with(prefix)) {
            frames.push(None);
        } else {
            frames.push(Some(symbol_frame(symbol)));
        }
    }

    frames.into_iter().flatten().collect()
}

fn symbol_frame(symbol: &str) -> Frame {
    let owner = if symbol.starts_with('<') {
        None
    } else {
        symbol
            .rsplit_once("::")
            .filter(|(owner, _)| owner.rsplit("::").next().is_some_and(|s| s.starts_with(char::is_uppercase)))
    };

    match owner {
        Some((class, function)) => Frame {
            function: Some(function.to_owned()),
            class: Some(class.to_owned()),
            ..Frame::default()
        },
        None => Frame {
            function: Some(symbol.to_owned()),
            ..Frame::default()
        },
    }
}

fn split_location(location: &str) -> (&str, Option<u32>) {
    let parts: Vec<&str> = location.rsplitn(3, ':').collect();

    match parts.as_slice() {
        [column, line, file] if column.parse::<u32>().is_ok() => (*file, line.parse().ok()),
        [line, file] => (*file, line.parse().ok()),
        _ => (location, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: std::backtrace::Backtrace::capture
             at /rustc/abc/library/std/src/backtrace.rs:296:9
   2: courier_core::raised::Raised::with_origin
             at ./crates/courier-core/src/raised.rs:65:28
   3: courier_server::api::orders::show::{{closure}}
             at ./crates/courier-server/src/api/orders.rs:41:9
   4: courier_server::state::OrderBook::get
             at ./crates/courier-server/src/state.rs:30:5
   5: <F as axum::handler::Handler<(M,T1),S>>::call
   6: tokio::runtime::task::raw::poll
";

    #[test]
    fn skips_capture_frames() {
        let frames = parse(SAMPLE);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].function.as_deref(), Some("courier_server::api::orders::show::{{closure}}"));
        assert_eq!(frames[0].file.as_deref(), Some("./crates/courier-server/src/api/orders.rs"));
        assert_eq!(frames[0].line, Some(41));
        assert!(frames[0].class.is_none());
    }

    #[test]
    fn splits_methods_from_their_type() {
        let frames = parse(SAMPLE);
        assert_eq!(frames[1].class.as_deref(), Some("courier_server::state::OrderBook"));
        assert_eq!(frames[1].function.as_deref(), Some("get"));
    }

    #[test]
    fn frames_without_location_keep_symbol_only() {
        let frames = parse(SAMPLE);
        assert_eq!(frames[2].function.as_deref(), Some("<F as axum::handler::Handler<(M,T1),S>>::call"));
        assert!(frames[2].file.is_none());
        assert!(frames[2].line.is_none());
        assert_eq!(frames[3].function.as_deref(), Some("tokio::runtime::task::raw::poll"));
    }

    #[test]
    fn disabled_capture_yields_no_frames() {
        assert!(frames(&Backtrace::disabled()).is_empty());
    }
}
