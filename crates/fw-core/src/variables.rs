//! Bound color-variable resolution.
//!
//! A paint whose color is bound to a design variable carries only the
//! variable id. Turning the id into a display name is an external async
//! lookup, so lookups go through `VariableCache`: an in-flight map of shared
//! futures keyed by variable id. Concurrent requests for the same id await
//! one lookup; the id is never resolved twice within a conversion call.

use crate::error::VariableError;
use crate::model::{Effect, Paint, PaintKind};
use futures::future::{LocalBoxFuture, Shared, try_join_all};
use futures::FutureExt;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

/// Looks up the display name of a color variable.
pub trait ColorVariableResolver {
    fn color_name(&self, id: &str) -> impl Future<Output = Result<String, VariableError>>;
}

/// A fixed id → name table, e.g. loaded from a variables JSON file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StaticVariables(pub HashMap<String, String>);

impl StaticVariables {
    /// # Errors
    /// Returns the `serde_json` error if the text is not a string map.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ColorVariableResolver for StaticVariables {
    fn color_name(&self, id: &str) -> impl Future<Output = Result<String, VariableError>> {
        let result = self.0.get(id).cloned().ok_or_else(|| VariableError {
            id: id.to_string(),
            reason: "no such variable".into(),
        });
        futures::future::ready(result)
    }
}

/// Resolver for callers that have no variable source. Every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl ColorVariableResolver for NoVariables {
    fn color_name(&self, id: &str) -> impl Future<Output = Result<String, VariableError>> {
        futures::future::ready(Err(VariableError {
            id: id.to_string(),
            reason: "no variable source is configured".into(),
        }))
    }
}

type Lookup = Shared<LocalBoxFuture<'static, Result<String, VariableError>>>;

/// Per-call, deduplicating front of a `ColorVariableResolver`.
pub struct VariableCache<R> {
    resolver: Rc<R>,
    lookups: RefCell<HashMap<String, Lookup>>,
}

impl<R: ColorVariableResolver + 'static> VariableCache<R> {
    pub fn new(resolver: Rc<R>) -> Self {
        Self {
            resolver,
            lookups: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a variable id to its name with commas removed.
    ///
    /// # Errors
    /// The resolver's failure, shared by every caller awaiting the same id.
    pub async fn color_name(&self, id: &str) -> Result<String, VariableError> {
        let lookup = self
            .lookups
            .borrow_mut()
            .entry(id.to_string())
            .or_insert_with(|| {
                let resolver = Rc::clone(&self.resolver);
                let id = id.to_string();
                async move {
                    log::trace!("resolving color variable {id}");
                    let name = resolver.color_name(&id).await?;
                    Ok(name.replace(',', ""))
                }
                .boxed_local()
                .shared()
            })
            .clone();
        lookup.await
    }

    /// Fill in `variable_color_name` on a solid paint or on the bound stops of
    /// a gradient. Gradient stops resolve concurrently.
    ///
    /// # Errors
    /// The first failed lookup.
    pub async fn resolve_paint(&self, paint: &mut Paint) -> Result<(), VariableError> {
        match &mut paint.kind {
            PaintKind::Solid {
                variable_id: Some(id),
                variable_color_name,
                ..
            } => {
                *variable_color_name = Some(self.color_name(id).await?);
            }
            PaintKind::Gradient { stops, .. } => {
                try_join_all(
                    stops
                        .iter_mut()
                        .filter(|stop| stop.variable_id.is_some())
                        .map(|stop| async move {
                            if let Some(id) = &stop.variable_id {
                                let name = self.color_name(id).await?;
                                stop.variable_color_name = Some(name);
                            }
                            Ok::<_, VariableError>(())
                        }),
                )
                .await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Fill in `variable_color_name` on a shadow effect. Blurs are skipped.
    ///
    /// # Errors
    /// The failed lookup.
    pub async fn resolve_effect(&self, effect: &mut Effect) -> Result<(), VariableError> {
        if !effect.is_shadow() {
            return Ok(());
        }
        if let Some(id) = &effect.variable_id {
            let name = self.color_name(id).await?;
            effect.variable_color_name = Some(name);
        }
        Ok(())
    }

    /// Resolve every paint of a list concurrently.
    ///
    /// # Errors
    /// The first failed lookup.
    pub async fn resolve_paints(&self, paints: &mut [Paint]) -> Result<(), VariableError> {
        try_join_all(paints.iter_mut().map(|paint| self.resolve_paint(paint))).await?;
        Ok(())
    }

    /// Number of distinct ids looked up so far.
    pub fn distinct_lookups(&self) -> usize {
        self.lookups.borrow().len()
    }
}
