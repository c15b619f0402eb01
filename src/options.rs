//! Comparison options passed in from Lua.
//!
//! Options arrive as a plain Lua table and are deserialized through
//! [`mlua::LuaSerdeExt`]. Every field is optional; missing fields fall back to
//! the same defaults the diff viewer starts with (case-sensitive, whitespace
//! shown). Unknown keys are rejected so typos surface immediately instead of
//! being silently ignored.
//!
//! ```lua
//! difft.compare(a, b, { case_sensitive = false, show_whitespace = false })
//! ```

use mlua::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonOptions {
    /// When `false`, both texts are lower-cased before lines are compared.
    pub case_sensitive: bool,

    /// When `false`, runs of whitespace collapse to a single space and each
    /// line is trimmed before comparison.
    ///
    /// Display text is never affected; only equality testing is.
    pub show_whitespace: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            show_whitespace: true,
        }
    }
}

impl ComparisonOptions {
    /// Reads options from an optional Lua value. `nil` yields the defaults.
    pub fn from_lua_opt(lua: &Lua, value: Option<LuaValue>) -> LuaResult<Self> {
        match value {
            None | Some(LuaValue::Nil) => Ok(Self::default()),
            Some(value) => lua.from_value(value),
        }
    }
}
