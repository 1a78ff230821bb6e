//! Template context: canonical settings plus the fixed constants every
//! template may use.

use serde::Serialize;
use serde_json::{Map, Value};

use repo_helper_core::Settings;

use crate::error::RenderError;

/// Header line stamped into every generated file that supports comments.
pub const MANAGED_MESSAGE: &str = "This file is managed by 'repo_helper'. Don't edit it directly.";

/// flake8 codes `lint_roller.sh` fixes automatically.
pub const LINT_FIX_LIST: &[&str] = &[
    "E301", "E303", "E304", "E305", "E306", "E502", "W291", "W293", "W391", "E226", "E225",
    "E241", "E231",
];

/// Codes fixed with `--aggressive`.
pub const LINT_BELLIGERENT_LIST: &[&str] = &["W292", "E265"];

/// Codes reported but left alone.
pub const LINT_WARN_LIST: &[&str] = &[
    "E101", "E111", "E112", "E113", "E121", "E122", "E124", "E125", "E127", "E128", "E129",
    "E131", "E133", "E201", "E202", "E203", "E211", "E222", "E223", "E224", "E225", "E227",
    "E228", "E242", "E251", "E261", "E262", "E271", "E272", "E402", "E703", "E711", "E712",
    "E713", "E714", "E721", "W504", "E302",
];

/// Rendering payload shared by every generator in a run.
///
/// Settings fields sit at the top level of the context (`{{ modname }}`),
/// next to the constants below.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext<'a> {
    #[serde(flatten)]
    pub settings: &'a Settings,
    pub managed_message: &'static str,
    pub lint_fix_list: &'static [&'static str],
    pub lint_warn_list: &'static [&'static str],
    pub lint_belligerent_list: &'static [&'static str],
}

impl<'a> TemplateContext<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        TemplateContext {
            settings,
            managed_message: MANAGED_MESSAGE,
            lint_fix_list: LINT_FIX_LIST,
            lint_warn_list: LINT_WARN_LIST,
            lint_belligerent_list: LINT_BELLIGERENT_LIST,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::Context)
    }
}

/// Fill-only-if-absent merge for nested mappings.
///
/// Returns a new mapping: every key of `user` with its value untouched, plus
/// every key of `defaults` that `user` does not set.
pub fn fill_absent<I, K>(user: &Map<String, Value>, defaults: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut merged = user.clone();
    for (key, value) in defaults {
        merged.entry(key.into()).or_insert(value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn user_value_wins_and_missing_defaults_are_added() {
        let user = as_map(json!({ "logo_only": false }));
        let merged = fill_absent(
            &user,
            [("logo_only", json!(true)), ("page_width", json!("1200px"))],
        );
        assert_eq!(
            Value::Object(merged),
            json!({ "logo_only": false, "page_width": "1200px" })
        );
    }

    #[test]
    fn constants_shadow_pass_through_keys() {
        let doc = serde_yaml::from_str(
            "author: A\nemail: a@b.c\nusername: a\nmodname: m\ncopyright_years: 2020\n\
             version: 1.0.0\nlicense: MIT\nshort_desc: d\nmanaged_message: mine\n",
        )
        .expect("yaml");
        let settings = repo_helper_core::resolve(&doc).expect("resolve");
        assert_eq!(settings.extra["managed_message"], "mine");

        let ctx = TemplateContext::new(&settings).to_tera_context().expect("context");
        assert_eq!(ctx.get("managed_message"), Some(&json!(MANAGED_MESSAGE)));
    }

    #[test]
    fn input_mapping_is_not_mutated() {
        let user = as_map(json!({ "a": 1 }));
        let _ = fill_absent(&user, [("b", json!(2))]);
        assert_eq!(Value::Object(user), json!({ "a": 1 }));
    }

    #[test]
    fn merge_is_order_independent_for_disjoint_defaults() {
        let user = Map::new();
        let ab = fill_absent(&user, [("a", json!(1)), ("b", json!(2))]);
        let ba = fill_absent(&user, [("b", json!(2)), ("a", json!(1))]);
        assert_eq!(Value::Object(ab), Value::Object(ba));
    }
}
