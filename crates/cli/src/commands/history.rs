// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw history`

use crate::output::{self, OutputFormat};
use crate::workspace::Workspace;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use gw_core::Operation;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct HistoryArgs {
    /// Only operations at or after this time (RFC 3339)
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// Only operations at or before this time (RFC 3339)
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
#[serde(transparent)]
struct HistoryRow<'a>(&'a Operation);

impl fmt::Display for HistoryRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.0;
        write!(
            f,
            "{:<8}  {}  {:<8} {}",
            op.id.short(),
            op.timestamp.format("%Y-%m-%d %H:%M:%S"),
            op.kind,
            op.description
        )?;
        if op.metadata.stashed {
            write!(f, " (stashed)")?;
        }
        Ok(())
    }
}

pub fn history(args: HistoryArgs, ws: &Workspace) -> Result<()> {
    let undo = ws.undo_service()?;
    let rows: Vec<HistoryRow<'_>> = undo
        .history(args.since, args.until)
        .into_iter()
        .map(HistoryRow)
        .collect();
    output::print_list(&rows, args.format, "No operations recorded");
    Ok(())
}
