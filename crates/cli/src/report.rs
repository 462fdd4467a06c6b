//! Plain-text rendering of command results.

use std::fmt::Write;

use plait_compose::Registrations;
use plait_model::AttributeSet;


/// Renders every registered recipe, followed by the declarations that failed.
pub fn recipes(registrations: &Registrations) -> String {
	if registrations.recipes.is_empty() && registrations.is_clean() {
		return "no endpoints declared\n".to_string();
	}

	let mut out = String::new();
	for recipe in &registrations.recipes {
		let _ = write!(out, "{recipe}");
	}
	for (declaration, error) in &registrations.failures {
		let _ = writeln!(out, "declaration `{declaration}` failed to register: {error}");
	}
	out
}

/// Renders the attributes `declaration` carries for `marker`.
pub fn attributes(declaration: &str, marker: &str, resolved: Option<&AttributeSet>) -> String {
	let Some(attrs) = resolved else {
		return format!("{declaration} does not carry `{marker}`\n");
	};

	let mut out = format!("{declaration} carries `{marker}`\n");
	for (name, value) in attrs.iter() {
		let _ = writeln!(out, "  {name} = {value}");
	}
	out
}
