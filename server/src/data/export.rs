//! NDJSON export stream
//!
//! Converts a lazy row stream into newline-delimited JSON: one object per
//! row, flushed before the next row is requested, followed by exactly one
//! terminal record. Completion emits a `_meta` trailer; a mid-stream store
//! failure emits a `_error` record and stops (rows already flushed stand).
//!
//! The generator owns whatever resources back the row stream (the dedicated
//! connection on the HTTP path), so dropping it mid-flight — a client
//! disconnect — tears the source down and releases the connection exactly
//! once.

use axum::body::Bytes;
use futures::{Stream, StreamExt, pin_mut};
use serde::Serialize;
use serde_json::json;

use crate::data::error::DataError;

/// Wrap a row stream into NDJSON lines with a terminal record
pub fn ndjson_export<S, T>(rows: S) -> impl Stream<Item = Bytes>
where
    S: Stream<Item = Result<T, DataError>>,
    T: Serialize,
{
    async_stream::stream! {
        pin_mut!(rows);
        let mut total_streamed: u64 = 0;

        while let Some(next) = rows.next().await {
            match next {
                Ok(row) => match serde_json::to_vec(&row) {
                    Ok(mut line) => {
                        line.push(b'\n');
                        total_streamed += 1;
                        yield Bytes::from(line);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize exported row");
                        yield error_line("row serialization failed");
                        return;
                    }
                },
                Err(e) => {
                    tracing::error!(error = %e, total_streamed, "Store failure mid-stream");
                    yield error_line(&e.to_string());
                    return;
                }
            }
        }

        tracing::debug!(total_streamed, "Export complete");
        yield trailer_line(total_streamed);
    }
}

fn json_line(value: serde_json::Value) -> Bytes {
    let mut line = value.to_string().into_bytes();
    line.push(b'\n');
    Bytes::from(line)
}

/// The single trailer record emitted on COMPLETE
fn trailer_line(total_streamed: u64) -> Bytes {
    json_line(json!({"_meta": {"total_streamed": total_streamed, "complete": true}}))
}

/// The single in-band error record emitted on FAILED
fn error_line(message: &str) -> Bytes {
    json_line(json!({"_error": message}))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::stream;

    use super::*;

    #[derive(Serialize)]
    struct TestRow {
        id: i64,
    }

    async fn collect_lines<S: Stream<Item = Bytes>>(export: S) -> Vec<String> {
        let chunks: Vec<Bytes> = export.collect().await;
        chunks
            .iter()
            .map(|b| String::from_utf8(b.to_vec()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn empty_stream_emits_only_the_trailer() {
        let rows = stream::iter(Vec::<Result<TestRow, DataError>>::new());
        let lines = collect_lines(ndjson_export(rows)).await;

        assert_eq!(
            lines,
            vec!["{\"_meta\":{\"total_streamed\":0,\"complete\":true}}\n"]
        );
    }

    #[tokio::test]
    async fn rows_are_counted_in_the_trailer() {
        let rows = stream::iter((0..3).map(|id| Ok::<_, DataError>(TestRow { id })));
        let lines = collect_lines(ndjson_export(rows)).await;

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "{\"id\":0}\n");
        assert_eq!(
            lines[3],
            "{\"_meta\":{\"total_streamed\":3,\"complete\":true}}\n"
        );
    }

    #[tokio::test]
    async fn mid_stream_failure_emits_error_after_flushed_rows() {
        let rows = stream::iter(vec![
            Ok(TestRow { id: 1 }),
            Ok(TestRow { id: 2 }),
            Err(DataError::config("connection reset")),
            // never reached: the export stops at the first failure
            Ok(TestRow { id: 3 }),
        ]);
        let lines = collect_lines(ndjson_export(rows)).await;

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "{\"id\":1}\n");
        assert_eq!(lines[1], "{\"id\":2}\n");
        assert_eq!(
            lines[2],
            "{\"_error\":\"Configuration error: connection reset\"}\n"
        );
    }

    #[tokio::test]
    async fn every_chunk_is_one_complete_json_line() {
        let rows = stream::iter((0..5).map(|id| Ok::<_, DataError>(TestRow { id })));
        let lines = collect_lines(ndjson_export(rows)).await;

        for line in lines {
            assert!(line.ends_with('\n'));
            let trimmed = line.trim_end();
            serde_json::from_str::<serde_json::Value>(trimmed).unwrap();
            assert!(!trimmed.contains('\n'));
        }
    }

    struct ReleaseGuard(Arc<AtomicUsize>);

    impl Drop for ReleaseGuard {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn dropping_the_export_tears_down_the_row_source_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let guard = ReleaseGuard(released.clone());

        let rows = async_stream::stream! {
            let _guard = guard;
            for id in 0..100 {
                yield Ok::<_, DataError>(TestRow { id });
            }
        };

        let mut export = Box::pin(ndjson_export(rows));
        assert!(export.next().await.is_some());
        assert_eq!(released.load(Ordering::SeqCst), 0);

        // Client disconnect: the body stream is dropped mid-flight
        drop(export);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_source_is_released_exactly_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let guard = ReleaseGuard(released.clone());

        let rows = async_stream::stream! {
            let _guard = guard;
            yield Ok::<_, DataError>(TestRow { id: 1 });
            yield Err(DataError::config("connection reset"));
        };

        let lines = collect_lines(ndjson_export(rows)).await;
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("{\"_error\":"));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_source_is_released_exactly_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let guard = ReleaseGuard(released.clone());

        let rows = async_stream::stream! {
            let _guard = guard;
            yield Ok::<_, DataError>(TestRow { id: 1 });
        };

        let lines = collect_lines(ndjson_export(rows)).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
