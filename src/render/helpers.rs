//! Template helpers.
//!
//! The signature vocabulary (`input_parameters`, `output_parameters`,
//! `input_calls`, `output_var_error`, `return`, `parameter_type`) is
//! always registered. Its text is produced by the plain functions in this
//! module, which take the package the code is generated into so that
//! types declared there come out unqualified.
//!
//! [`FunctionLibrary`] carries any additional named helpers a caller wants
//! to expose; [`FunctionLibrary::standard`] is a small text-munging set.

use std::fmt;

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, RenderContext, RenderError,
    RenderErrorReason, ScopedJson,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{Method, Parameter};

/// `name type` pairs separated by commas; a trailing variadic is written
/// `name ...elem`.
pub fn input_parameters(method: &Method, package: &str) -> String {
    join(method.inputs.iter().map(|p| declaration(p, package)))
}

/// The result list as it follows a parameter list: empty, a lone unnamed
/// type, or a parenthesized list.
pub fn output_parameters(method: &Method, package: &str) -> String {
    match method.outputs.as_slice() {
        [] => String::new(),
        [only] if only.name.is_empty() => only.ty.source_in(Some(package)).to_string(),
        outputs => format!("({})", join(outputs.iter().map(|p| declaration(p, package)))),
    }
}

/// Input names as call arguments, spreading a trailing variadic.
pub fn input_calls(method: &Method) -> String {
    let last = method.inputs.len().saturating_sub(1);
    join(method.inputs.iter().enumerate().map(|(i, p)| {
        if i == last && p.ty.is_variadic() {
            format!("{}...", p.name)
        } else {
            p.name.clone()
        }
    }))
}

/// Name of the output carrying the method's error: the final output, when
/// it is the only one of type `error`. Empty otherwise.
pub fn output_var_error(method: &Method) -> String {
    let errors = method.outputs.iter().filter(|p| p.ty.is_error()).count();
    match method.outputs.last() {
        Some(last) if errors == 1 && last.ty.is_error() => last.name.clone(),
        _ => String::new(),
    }
}

/// `return` when the method has outputs.
pub fn return_keyword(method: &Method) -> &'static str {
    if method.outputs.is_empty() {
        ""
    } else {
        "return"
    }
}

fn declaration(param: &Parameter, package: &str) -> String {
    let ty = param.ty.source_in(Some(package));
    if param.name.is_empty() {
        ty.to_string()
    } else {
        format!("{} {ty}", param.name)
    }
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vocabulary {
    InputParameters,
    OutputParameters,
    InputCalls,
    OutputVarError,
    Return,
    ParameterType,
}

impl Vocabulary {
    const ALL: [Vocabulary; 6] = [
        Vocabulary::InputParameters,
        Vocabulary::OutputParameters,
        Vocabulary::InputCalls,
        Vocabulary::OutputVarError,
        Vocabulary::Return,
        Vocabulary::ParameterType,
    ];

    fn name(self) -> &'static str {
        match self {
            Vocabulary::InputParameters => "input_parameters",
            Vocabulary::OutputParameters => "output_parameters",
            Vocabulary::InputCalls => "input_calls",
            Vocabulary::OutputVarError => "output_var_error",
            Vocabulary::Return => "return",
            Vocabulary::ParameterType => "parameter_type",
        }
    }
}

/// One vocabulary helper bound to the output package.
struct SignatureHelper {
    kind: Vocabulary,
    package: String,
}

impl SignatureHelper {
    fn text(&self, value: &Value) -> Result<String, RenderError> {
        let name = self.kind.name();
        let method = || argument::<Method>(name, value);
        Ok(match self.kind {
            Vocabulary::InputParameters => input_parameters(&method()?, &self.package),
            Vocabulary::OutputParameters => output_parameters(&method()?, &self.package),
            Vocabulary::InputCalls => input_calls(&method()?),
            Vocabulary::OutputVarError => output_var_error(&method()?),
            Vocabulary::Return => return_keyword(&method()?).to_string(),
            Vocabulary::ParameterType => {
                let param: Parameter = argument(name, value)?;
                param.ty.source_in(Some(&self.package)).to_string()
            }
        })
    }
}

impl HelperDef for SignatureHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let value = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(self.kind.name(), 0))?
            .value();
        Ok(ScopedJson::Derived(Value::String(self.text(value)?)))
    }
}

fn argument<T: DeserializeOwned>(helper: &'static str, value: &Value) -> Result<T, RenderError> {
    serde_json::from_value(value.clone()).map_err(|e| {
        RenderErrorReason::Other(format!("{helper}: unexpected argument: {e}")).into()
    })
}

/// Registers the signature vocabulary for code generated into `package`.
pub(crate) fn register_vocabulary(registry: &mut Handlebars<'_>, package: &str) {
    for kind in Vocabulary::ALL {
        registry.register_helper(
            kind.name(),
            Box::new(SignatureHelper {
                kind,
                package: package.to_string(),
            }),
        );
    }
}

type BoxedHelper = Box<dyn HelperDef + Send + Sync>;

/// Named helpers made available to templates in addition to the
/// signature vocabulary, which always takes precedence.
#[derive(Default)]
pub struct FunctionLibrary {
    helpers: Vec<(String, BoxedHelper)>,
}

impl FunctionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// `upper`, `lower`, `trim`, `replace`, `trimPrefix`, `trimSuffix`,
    /// `default` and `join`. Argument order puts the string operated on
    /// last: `(replace "old" "new" s)`, `(trimPrefix "Get" name)`,
    /// `(default "none" value)`, `(join ", " list)`.
    pub fn standard() -> Self {
        Self::new()
            .with("upper", upper)
            .with("lower", lower)
            .with("trim", trim)
            .with("replace", replace)
            .with("trimPrefix", trim_prefix)
            .with("trimSuffix", trim_suffix)
            .with("default", default_value)
            .with("join", join_values)
    }

    pub fn with(mut self, name: impl Into<String>, helper: impl HelperDef + Send + Sync + 'static) -> Self {
        self.insert(name, helper);
        self
    }

    /// Adds or replaces the helper called `name`.
    pub fn insert(&mut self, name: impl Into<String>, helper: impl HelperDef + Send + Sync + 'static) {
        let name = name.into();
        self.helpers.retain(|(existing, _)| *existing != name);
        self.helpers.push((name, Box::new(helper)));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    pub(crate) fn install(self, registry: &mut Handlebars<'_>) {
        for (name, helper) in self.helpers {
            registry.register_helper(&name, helper);
        }
    }
}

impl fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(trim: |s: str| s.trim());
handlebars_helper!(replace: |old: str, new: str, s: str| s.replace(old, new));
handlebars_helper!(trim_prefix: |prefix: str, s: str| s.strip_prefix(prefix).unwrap_or(s));
handlebars_helper!(trim_suffix: |suffix: str, s: str| s.strip_suffix(suffix).unwrap_or(s));
handlebars_helper!(default_value: |fallback: Json, value: Json| {
    if truthy(value) { value.clone() } else { fallback.clone() }
});
handlebars_helper!(join_values: |sep: str, items: array| {
    items
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(sep)
});
