//! The adapter contract between the host and the service client.

use super::{diagnostics::Diagnostics, schema::Schema};
use crate::core::{domain::error::IdcError, infrastructure::context::OperationContext};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

/// State and diagnostics returned by every adapter entry point.
///
/// `state` is `None` when the resource no longer exists (after a delete, or
/// a read that found nothing). A failed create may still carry state holding
/// the server-assigned identity, so the host can track the partial resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<S> {
    pub state: Option<S>,
    pub diagnostics: Diagnostics,
}

impl<S> Outcome<S> {
    pub fn ok(state: S) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    /// No state and no diagnostics: the resource is gone.
    pub fn removed() -> Self {
        Self {
            state: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// An error diagnostic for `err`, keeping `state` if any.
    pub fn failed(state: Option<S>, summary: impl Into<String>, err: &IdcError) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_idc_error(summary, err);
        Self { state, diagnostics }
    }

    pub fn with_diagnostics(state: Option<S>, diagnostics: Diagnostics) -> Self {
        Self { state, diagnostics }
    }

    #[must_use]
    pub fn with_warning(mut self, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        self.diagnostics.add_warning(summary, detail);
        self
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Outcome<T> {
        Outcome {
            state: self.state.map(f),
            diagnostics: self.diagnostics,
        }
    }
}

/// A managed resource kind.
///
/// Attribute names of `Plan` are a subset of those of `State`, and both match
/// the names declared by [`Resource::schema`].
#[async_trait]
pub trait Resource: Send + Sync {
    type Plan: Serialize + DeserializeOwned + Send + Sync + 'static;
    type State: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// The host-facing type name, e.g. `intelcloud_filesystem`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, ctx: &OperationContext, plan: Self::Plan) -> Outcome<Self::State>;

    /// Refreshes `state` from the server. A missing resource yields no state.
    async fn read(&self, ctx: &OperationContext, state: Self::State) -> Outcome<Self::State>;

    /// Resources have no in-place update: a plan that changes a
    /// `requires_replace` attribute is rejected, anything else refreshes state.
    async fn update(
        &self,
        ctx: &OperationContext,
        prior: Self::State,
        plan: Self::Plan,
    ) -> Outcome<Self::State> {
        let replace = match replace_paths(&self.schema(), &prior, &plan) {
            Ok(paths) => paths,
            Err(err) => return Outcome::failed(Some(prior), "Error comparing plan", &err),
        };
        if !replace.is_empty() {
            return reject_update(prior, &replace);
        }
        self.read(ctx, prior).await
    }

    /// Deletes the resource. Success yields no state.
    async fn delete(&self, ctx: &OperationContext, state: Self::State) -> Outcome<Self::State>;

    /// Builds state for an existing resource from its import id.
    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<Self::State>;
}

/// Paths whose change between `prior` and `plan` forces replacement.
pub fn replace_paths<S: Serialize, P: Serialize>(
    schema: &Schema,
    prior: &S,
    plan: &P,
) -> Result<Vec<String>, IdcError> {
    let prior = to_json(prior)?;
    let plan = to_json(plan)?;
    Ok(schema.replace_diff(&prior, &plan))
}

/// The outcome of an update that would need a replacement.
pub fn reject_update<S>(prior: S, paths: &[String]) -> Outcome<S> {
    let mut diagnostics = Diagnostics::new();
    diagnostics.add_error(
        "Update requires replacement",
        format!(
            "changing {} requires destroying and recreating the resource",
            paths.join(", ")
        ),
    );
    Outcome::with_diagnostics(Some(prior), diagnostics)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, IdcError> {
    serde_json::to_value(value).map_err(|e| IdcError::Parse(e.to_string()))
}

fn from_json<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, Diagnostics> {
    serde_json::from_value(value).map_err(|e| {
        let mut diags = Diagnostics::new();
        diags.add_error(format!("Invalid {}", what), e.to_string());
        diags
    })
}

fn encode<S: Serialize>(outcome: Outcome<S>) -> Outcome<Value> {
    let Outcome {
        state,
        mut diagnostics,
    } = outcome;
    let state = match state.map(|s| serde_json::to_value(&s)).transpose() {
        Ok(state) => state,
        Err(e) => {
            diagnostics.add_error("Error encoding state", e.to_string());
            None
        }
    };
    Outcome { state, diagnostics }
}

/// Object-safe, JSON-typed view of a resource, as driven by the host.
#[async_trait]
pub trait DynResource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn create(&self, ctx: &OperationContext, plan: Value) -> Outcome<Value>;
    async fn read(&self, ctx: &OperationContext, state: Value) -> Outcome<Value>;
    async fn update(&self, ctx: &OperationContext, prior: Value, plan: Value) -> Outcome<Value>;
    async fn delete(&self, ctx: &OperationContext, state: Value) -> Outcome<Value>;
    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<Value>;
}

/// Adapts a typed [`Resource`] to [`DynResource`]: plans are validated
/// against the schema and given their defaults before decoding.
pub struct JsonResource<R>(pub R);

impl<R: Resource> JsonResource<R> {
    fn decode_plan(&self, plan: Value) -> Result<R::Plan, Diagnostics> {
        let plan = self.0.schema().prepare_plan(plan)?;
        from_json(plan, "plan")
    }

    fn log_state(&self, operation: &str, outcome: &Outcome<Value>) {
        if let Some(state) = &outcome.state {
            let redacted = self.0.schema().redact(state);
            debug!(
                resource = self.0.type_name(),
                operation,
                state = %redacted,
                diagnostics = outcome.diagnostics.len(),
                "adapter result"
            );
        }
    }
}

#[async_trait]
impl<R: Resource> DynResource for JsonResource<R> {
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn schema(&self) -> Schema {
        self.0.schema()
    }

    async fn create(&self, ctx: &OperationContext, plan: Value) -> Outcome<Value> {
        let plan = match self.decode_plan(plan) {
            Ok(plan) => plan,
            Err(diags) => return Outcome::with_diagnostics(None, diags),
        };
        let outcome = encode(self.0.create(ctx, plan).await);
        self.log_state("create", &outcome);
        outcome
    }

    async fn read(&self, ctx: &OperationContext, state: Value) -> Outcome<Value> {
        let prior = match from_json::<R::State>(state.clone(), "state") {
            Ok(prior) => prior,
            Err(diags) => return Outcome::with_diagnostics(Some(state), diags),
        };
        let outcome = encode(self.0.read(ctx, prior).await);
        self.log_state("read", &outcome);
        outcome
    }

    async fn update(&self, ctx: &OperationContext, prior: Value, plan: Value) -> Outcome<Value> {
        let decoded_prior = match from_json::<R::State>(prior.clone(), "state") {
            Ok(decoded) => decoded,
            Err(diags) => return Outcome::with_diagnostics(Some(prior), diags),
        };
        let plan = match self.decode_plan(plan) {
            Ok(plan) => plan,
            Err(diags) => return Outcome::with_diagnostics(Some(prior), diags),
        };
        let outcome = encode(self.0.update(ctx, decoded_prior, plan).await);
        self.log_state("update", &outcome);
        outcome
    }

    async fn delete(&self, ctx: &OperationContext, state: Value) -> Outcome<Value> {
        let prior = match from_json::<R::State>(state.clone(), "state") {
            Ok(prior) => prior,
            Err(diags) => return Outcome::with_diagnostics(Some(state), diags),
        };
        encode(self.0.delete(ctx, prior).await)
    }

    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<Value> {
        let outcome = encode(self.0.import(ctx, id).await);
        self.log_state("import", &outcome);
        outcome
    }
}

/// A read-only data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Config: DeserializeOwned + Send + 'static;
    type State: Serialize + Send + 'static;

    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn read(&self, ctx: &OperationContext, config: Self::Config) -> Outcome<Self::State>;
}

/// Object-safe, JSON-typed view of a data source.
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn read(&self, ctx: &OperationContext, config: Value) -> Outcome<Value>;
}

/// Adapts a typed [`DataSource`] to [`DynDataSource`].
pub struct JsonDataSource<D>(pub D);

#[async_trait]
impl<D: DataSource> DynDataSource for JsonDataSource<D> {
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn schema(&self) -> Schema {
        self.0.schema()
    }

    async fn read(&self, ctx: &OperationContext, config: Value) -> Outcome<Value> {
        let config = match self
            .0
            .schema()
            .prepare_plan(config)
            .and_then(|config| from_json::<D::Config>(config, "configuration"))
        {
            Ok(config) => config,
            Err(diags) => return Outcome::with_diagnostics(None, diags),
        };
        encode(self.0.read(ctx, config).await)
    }
}
