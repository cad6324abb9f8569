//! Host glue between a chat transport and the gate.
//!
//! Acts as both the message source (inbound messages go through the
//! decision pipeline before dispatch) and the outbound sender (every reply
//! goes through the outbound filter before transmission).

use crate::codec::{InboundLine, InboundLineCodec};
use crate::config::{CommandNames, Config};
use crate::db::BlockStore;
use crate::gate::{AdminCommand, BlockCommands, Notice, OutboundFilter, Pipeline, Verdict};
use crate::message::{InboundMessage, Outbound};
use crate::telemetry::spans;
use futures_util::StreamExt;
use serde::Serialize;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;
use tracing::{Instrument, warn};

/// What the transport should do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Hand the message to normal command dispatch.
    Dispatch {
        message: InboundMessage,
        verdict: Verdict,
    },
    /// Transmit `content` to the channel.
    Send {
        platform: String,
        channel_id: String,
        content: String,
    },
    /// An outbound message was suppressed; transmit nothing.
    Suppressed { platform: String, channel_id: String },
}

/// Runs the gate for one process.
pub struct Host {
    names: CommandNames,
    pipeline: Pipeline,
    commands: BlockCommands,
    outbound: OutboundFilter,
}

impl Host {
    pub fn new(config: Arc<Config>, store: Arc<dyn BlockStore>) -> Self {
        let commands = BlockCommands::new(
            Arc::clone(&store),
            config.commands.authority,
            config.gate.allow_self_operation,
        );
        Self {
            names: config.commands.clone(),
            outbound: OutboundFilter::new(&config.outbound),
            pipeline: Pipeline::new(Arc::clone(&config), store),
            commands,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Gate `msg`, then either run it as an administrative command or hand
    /// it to dispatch. A denied message yields no events at all.
    pub async fn handle(&self, msg: InboundMessage) -> Vec<HostEvent> {
        let span = spans::inbound(&msg.platform, &msg.channel_id, &msg.user_id);
        async {
            let decision = self.pipeline.decide(&msg).await;
            if !decision.is_allowed() {
                return Vec::new();
            }

            match AdminCommand::parse(&self.names, &msg) {
                Some(cmd) => {
                    let notice = self.run_admin(&msg, &cmd).await;
                    vec![self.send(&msg.platform, &msg.channel_id, notice.to_string())]
                }
                None => vec![HostEvent::Dispatch {
                    message: msg,
                    verdict: decision.verdict,
                }],
            }
        }
        .instrument(span)
        .await
    }

    /// Read inbound messages as JSON lines from `input` until EOF, writing
    /// every resulting event as a JSON line to `output`.
    ///
    /// Bad lines are logged and skipped; only I/O errors end the loop.
    pub async fn serve<R, W>(&self, input: R, mut output: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(input, InboundLineCodec::new());

        while let Some(frame) = lines.next().await {
            let line = match frame? {
                InboundLine::Line(line) => line,
                InboundLine::NotUtf8 => {
                    warn!("Skipping inbound line that is not valid UTF-8");
                    continue;
                }
                InboundLine::TooLong => {
                    warn!("Skipping over-long inbound line");
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let msg: InboundMessage = match serde_json::from_str(&line) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed inbound message");
                    continue;
                }
            };

            for event in self.handle(msg).await {
                let mut out = serde_json::to_string(&event).map_err(io::Error::other)?;
                out.push('\n');
                output.write_all(out.as_bytes()).await?;
            }
            output.flush().await?;
        }
        Ok(())
    }

    /// Pass `content` through the outbound filter.
    pub fn send(&self, platform: &str, channel_id: &str, content: String) -> HostEvent {
        match self.outbound.apply(content) {
            Outbound::Send(content) => HostEvent::Send {
                platform: platform.to_string(),
                channel_id: channel_id.to_string(),
                content,
            },
            Outbound::Suppressed => HostEvent::Suppressed {
                platform: platform.to_string(),
                channel_id: channel_id.to_string(),
            },
        }
    }

    async fn run_admin(&self, msg: &InboundMessage, cmd: &AdminCommand) -> Notice {
        let span = spans::admin_command(cmd.label(), cmd.argument.as_deref());
        let notice = match self.commands.execute(msg, cmd).instrument(span).await {
            Ok(notice) => notice,
            Err(e) => {
                warn!(command = cmd.label(), error = %e, "Block command failed");
                Notice::Failed
            }
        };
        crate::metrics::record_admin_command(cmd.label(), notice.outcome());
        notice
    }
}
