//! # textdiff-nvim
//!
//! A Neovim plugin for comparing two texts line by line, with character-level
//! highlighting inside changed lines.
//!
//! This crate provides Lua bindings around a small greedy diff engine. Lines are
//! aligned with a bounded lookahead (10 lines), and every removed or added line
//! is refined with the same strategy at character granularity (20 characters).
//! The engine is a heuristic: it is fast and predictable, but it does not
//! guarantee a minimal diff.
//!
//! ## Architecture
//!
//! - `options` - Comparison options and their deserialization from Lua
//! - `normalize` - Case folding and whitespace collapsing used for equality
//! - `matcher` - Greedy bounded-lookahead alignment
//! - `highlight` - Character spans for changed lines
//! - `compare` - Orchestration, statistics and result types
//! - `lib` (this module) - Lua bindings
//!
//! ## Usage from Lua
//!
//! ```lua
//! local textdiff = require("textdiff_nvim")
//!
//! -- Compare two buffers' contents
//! local result, err = textdiff.compare(a, b, { case_sensitive = false })
//! if not result then
//!   vim.notify(err, vim.log.levels.WARN)
//!   return
//! end
//! print(result.stats.added, result.stats.removed)
//!
//! -- Compare two files on disk
//! local result, err = textdiff.compare_files("old.txt", "new.txt")
//! ```
//!
//! Comparison failures (blank input, unreadable files) are returned as
//! `nil, message` rather than raised, so callers can show them to the user.
//! Malformed option tables raise a Lua error.

use mlua::prelude::*;
use std::path::PathBuf;

mod compare;
mod highlight;
mod matcher;
mod normalize;
mod options;

use compare::{CompareError, ComparisonResult};
use options::ComparisonOptions;

/// Converts a comparison outcome into Lua's `value | nil, message` convention.
fn into_lua_outcome<T: IntoLua>(
    lua: &Lua,
    outcome: Result<T, CompareError>,
) -> LuaResult<(LuaValue, Option<String>)> {
    match outcome {
        Ok(value) => Ok((value.into_lua(lua)?, None)),
        Err(err) => Ok((LuaValue::Nil, Some(err.to_string()))),
    }
}

/// Renders a comparison as a JSON report.
fn json_report(result: &ComparisonResult) -> LuaResult<String> {
    result
        .to_json()
        .map_err(|e| LuaError::RuntimeError(format!("Failed to serialize diff: {e}")))
}

/// Compares two texts.
fn compare(
    lua: &Lua,
    (text_a, text_b, opts): (String, String, Option<LuaValue>),
) -> LuaResult<(LuaValue, Option<String>)> {
    let opts = ComparisonOptions::from_lua_opt(lua, opts)?;
    into_lua_outcome(lua, compare::compare(&text_a, &text_b, opts))
}

/// Compares the contents of two files.
fn compare_files(
    lua: &Lua,
    (path_a, path_b, opts): (String, String, Option<LuaValue>),
) -> LuaResult<(LuaValue, Option<String>)> {
    let opts = ComparisonOptions::from_lua_opt(lua, opts)?;
    let outcome = compare::compare_files(&PathBuf::from(path_a), &PathBuf::from(path_b), opts);
    into_lua_outcome(lua, outcome)
}

/// Compares two texts and returns the result as a JSON string.
fn compare_json(
    lua: &Lua,
    (text_a, text_b, opts): (String, String, Option<LuaValue>),
) -> LuaResult<(LuaValue, Option<String>)> {
    let opts = ComparisonOptions::from_lua_opt(lua, opts)?;
    match compare::compare(&text_a, &text_b, opts) {
        Ok(result) => Ok((json_report(&result)?.into_lua(lua)?, None)),
        Err(err) => Ok((LuaValue::Nil, Some(err.to_string()))),
    }
}

/// Character spans for a single pair of lines.
fn char_diff(lua: &Lua, (line_a, line_b): (String, String)) -> LuaResult<LuaTable> {
    highlight::spans_into_lua(lua, highlight::char_diff(&line_a, &line_b))
}

/// The normalized form of a text, as used for line equality.
fn normalize(lua: &Lua, (text, opts): (String, Option<LuaValue>)) -> LuaResult<String> {
    let opts = ComparisonOptions::from_lua_opt(lua, opts)?;
    Ok(normalize::normalize(&text, opts))
}

/// Creates the Lua module exports. Called by mlua when loaded via `require("textdiff_nvim")`.
#[mlua::lua_module]
fn textdiff_nvim(lua: &Lua) -> LuaResult<LuaTable> {
    let exports = lua.create_table()?;
    exports.set(
        "compare",
        lua.create_function(|lua, args: (String, String, Option<LuaValue>)| compare(lua, args))?,
    )?;
    exports.set(
        "compare_files",
        lua.create_function(|lua, args: (String, String, Option<LuaValue>)| {
            compare_files(lua, args)
        })?,
    )?;
    exports.set(
        "compare_json",
        lua.create_function(|lua, args: (String, String, Option<LuaValue>)| {
            compare_json(lua, args)
        })?,
    )?;
    exports.set(
        "char_diff",
        lua.create_function(|lua, args: (String, String)| char_diff(lua, args))?,
    )?;
    exports.set(
        "normalize",
        lua.create_function(|lua, args: (String, Option<LuaValue>)| normalize(lua, args))?,
    )?;
    Ok(exports)
}
