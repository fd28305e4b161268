//! Variant resolution
//!
//! Construction is a two-phase factory: build a provisional instance of the
//! requested type, ask its selector which type the data really describes, and
//! rebuild from the original input when the answer is a different type. The
//! target may declare a selector of its own, so resolution repeats until a
//! type keeps its instance. Visiting a type twice is a cycle and fails.

use indexmap::IndexSet;

use super::DelegateRegistry;
use crate::core::{DelegateError, Result, VD0001, VD0002, VD0003, VD0004, VD0008};
use crate::delegate::Delegate;
use crate::model::ViewData;

/// Outcome of constructing a delegate
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The final instance
    pub delegate: Delegate,
    /// Type names in visitation order; its length is the number of
    /// construction steps taken
    pub path: Vec<String>,
}

impl Resolution {
    /// Number of construction steps taken
    pub fn steps(&self) -> usize {
        self.path.len()
    }
}

pub(crate) fn resolve(
    registry: &DelegateRegistry,
    type_name: &str,
    data: &ViewData,
) -> Result<Resolution> {
    let max_depth = registry.config().max_resolution_depth;
    let mut visited: IndexSet<String> = IndexSet::new();
    let mut current = registry.get(type_name).ok_or_else(|| {
        DelegateError::construction(VD0001, type_name, "type is not registered")
    })?;

    loop {
        if !visited.insert(current.name().to_string()) {
            let chain = visited
                .iter()
                .map(String::as_str)
                .chain([current.name()])
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DelegateError::construction(
                VD0003,
                type_name,
                format!("variant selectors form a cycle: {chain}"),
            ));
        }
        if visited.len() > max_depth {
            return Err(DelegateError::construction(
                VD0004,
                type_name,
                format!("variant resolution exceeded {max_depth} steps"),
            ));
        }

        let provisional = Delegate::assign(current.clone(), data).map_err(|err| {
            let source = visited.len().checked_sub(2).and_then(|i| visited.get_index(i));
            match source {
                Some(source) => DelegateError::construction(
                    VD0008,
                    current.name(),
                    format!("variant selected by {source} cannot be built: {err}"),
                ),
                None => err,
            }
        })?;

        let Some(selector) = current.schema().variant_selector() else {
            return Ok(finish(provisional, visited));
        };

        let target = selector(&provisional).map_err(|err| {
            DelegateError::construction(
                VD0002,
                current.name(),
                format!("variant selector failed: {err}"),
            )
        })?;

        if target == current.name() {
            return Ok(finish(provisional, visited));
        }

        log::debug!(
            "{} resolved to variant {} for {}",
            current.name(),
            target,
            provisional.id()
        );

        current = registry.get(&target).ok_or_else(|| {
            DelegateError::construction(
                VD0001,
                current.name(),
                format!("variant selector returned unknown type '{target}'"),
            )
        })?;
    }
}

fn finish(delegate: Delegate, visited: IndexSet<String>) -> Resolution {
    Resolution {
        delegate,
        path: visited.into_iter().collect(),
    }
}
