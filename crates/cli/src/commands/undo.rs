// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw undo`

use crate::error::GwError;
use crate::workspace::Workspace;
use anyhow::Result;
use clap::Args;
use gw_core::OperationId;
use std::collections::HashMap;

#[derive(Args)]
pub struct UndoArgs {
    /// Number of recent operations to undo
    #[arg(default_value_t = 1)]
    pub count: usize,

    /// Undo one specific operation instead
    #[arg(long, conflicts_with = "count")]
    pub id: Option<String>,
}

pub async fn undo(args: UndoArgs, ws: &Workspace) -> Result<()> {
    let mut undo = ws.undo_service()?;
    let descriptions: HashMap<OperationId, String> = undo
        .log()
        .iter()
        .map(|op| (op.id.clone(), op.description.clone()))
        .collect();

    let result = match args.id {
        Some(id) => {
            let id = OperationId::new(id);
            undo.undo_operation(&id).await.map(|()| vec![id])
        }
        None => undo.undo_last(args.count).await,
    };
    // Undos that completed before a failure stay undone
    ws.save(&undo)?;

    let undone = result.map_err(GwError::from_undo)?;
    for id in &undone {
        let description = descriptions.get(id).map_or("", String::as_str);
        println!("Undid {}  {}", id.short(), description);
    }
    Ok(())
}
