// Line-oriented front end for the search engine
//
// JSON mode: one request object in, one response object out, flushed per line.
// Interactive mode: one raw query per line, results printed for a human.

use crate::config::Config;
use crate::core::{SearchEngine, SearchQuery};
use crate::error::Result;
use crate::transport::protocol::{ErrorResponse, Request, Response};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

pub struct Server<'a> {
    engine: &'a SearchEngine,
    config: &'a Config,
}

impl<'a> Server<'a> {
    pub fn new(engine: &'a SearchEngine, config: &'a Config) -> Self {
        Self { engine, config }
    }

    /// Serve queries until `input` runs dry
    ///
    /// Returns early only on I/O failure or an internal engine fault.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            let reply = if self.config.interactive {
                self.handle_text(&line)?
            } else {
                match self.handle_json(&line)? {
                    Some(reply) => reply,
                    None => continue,
                }
            };

            output.write_all(reply.as_bytes()).await?;
            output.flush().await?;
        }

        Ok(())
    }

    /// Answer one JSON request line. Blank lines get no answer.
    ///
    /// A line that doesn't decode gets an `{"error": ...}` reply; the stream
    /// keeps going.
    pub fn handle_json(&self, line: &str) -> Result<Option<String>> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let mut reply = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let outcome = self.engine.handle(&request.to_query(self.config))?;
                serde_json::to_string(&Response {
                    query: request.query,
                    results: outcome.results,
                    elapsed: outcome.elapsed,
                })?
            }
            Err(e) => {
                warn!(error = %e, "malformed request");
                serde_json::to_string(&ErrorResponse {
                    error: format!("malformed request: {}", e),
                })?
            }
        };

        reply.push('\n');
        Ok(Some(reply))
    }

    /// Answer one plain-text query with the configured defaults
    pub fn handle_text(&self, line: &str) -> Result<String> {
        let query = SearchQuery {
            text: line.to_string(),
            case_sensitive: self.config.case_sensitive,
            max_results: self.config.max_results,
        };
        let outcome = self.engine.handle(&query)?;

        let mut reply = String::new();
        for cmd in &outcome.results {
            reply.push_str("\t ");
            reply.push_str(cmd);
            reply.push('\n');
        }
        reply.push_str(&format!("in {:?}\n", outcome.elapsed));

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Corpus, Rank, Ranker};
    use crate::error::RecallError;
    use crate::shell::HistoryRecord;
    use serde_json::Value;

    fn engine() -> SearchEngine {
        let records: Vec<HistoryRecord> = ["cd ..", "git commit -m x", "git checkout main"]
            .iter()
            .map(|cmd| HistoryRecord {
                timestamp: 0,
                execution_time: 0,
                command: cmd.to_string(),
            })
            .collect();
        SearchEngine::new(&records)
    }

    async fn serve(engine: &SearchEngine, config: &Config, input: &str) -> Result<String> {
        let mut output = Vec::new();
        Server::new(engine, config)
            .run(input.as_bytes(), &mut output)
            .await?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn parse_lines(output: &str) -> Vec<Value> {
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_json_round() {
        let engine = engine();
        let config = Config::default();
        let input = "{\"query\":\"git c\",\"case_sensitive\":false,\"max_results\":10}\n\
                     {\"query\":\"\",\"max_results\":2}\n";

        let output = serve(&engine, &config, input).await.unwrap();
        let replies = parse_lines(&output);

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["query"], "git c");
        assert_eq!(
            replies[0]["results"],
            serde_json::json!(["git checkout main", "git commit -m x"])
        );
        assert!(replies[0]["elapsed"].is_u64());
        assert_eq!(
            replies[1]["results"],
            serde_json::json!(["git checkout main", "git commit -m x"])
        );
    }

    #[tokio::test]
    async fn test_malformed_line_gets_error_and_stream_continues() {
        let engine = engine();
        let config = Config::default();
        let input = "{oops\n\n{\"query\":\"cd\",\"case_sensitive\":true}\n";

        let output = serve(&engine, &config, input).await.unwrap();
        let replies = parse_lines(&output);

        assert_eq!(replies.len(), 2);
        assert!(replies[0]["error"].as_str().unwrap().contains("malformed request"));
        assert_eq!(replies[1]["results"], serde_json::json!(["cd .."]));
    }

    #[tokio::test]
    async fn test_interactive_mode() {
        let engine = engine();
        let config = Config {
            interactive: true,
            max_results: 1,
            ..Config::default()
        };

        let output = serve(&engine, &config, "GIT\n").await.unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "\t git checkout main");
        assert!(lines[1].starts_with("in "));
    }

    #[tokio::test]
    async fn test_interactive_case_sensitive() {
        let engine = engine();
        let config = Config {
            interactive: true,
            case_sensitive: true,
            ..Config::default()
        };

        let output = serve(&engine, &config, "GIT\n").await.unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_blank_json_line_is_ignored() {
        let engine = engine();
        let config = Config::default();
        let server = Server::new(&engine, &config);
        assert_eq!(server.handle_json("   ").unwrap(), None);
    }

    #[test]
    fn test_internal_fault_stops_the_server() {
        struct PhantomRanker;

        impl Ranker for PhantomRanker {
            fn rank<'a>(&self, _query: &str, _targets: &'a [String]) -> Vec<Rank<'a>> {
                vec![Rank {
                    target: "phantom",
                    distance: 0,
                    original_index: 0,
                }]
            }
        }

        let engine = SearchEngine::with_ranker(Corpus::default(), Box::new(PhantomRanker));
        let config = Config::default();

        let result = tokio_test::block_on(serve(&engine, &config, "{\"query\":\"x\"}\n"));
        assert!(matches!(result, Err(RecallError::MissingRestoration(_))));
    }
}
