//! WASM bindings for the reflow passes
//!
//! Trees and configs cross the boundary as JSON strings in the template's
//! camelCase format. The browser host keeps its own surfaces and calls the
//! pure passes; `reflowTemplate` runs the full headless reflow.

use crate::document::Template;
use crate::error::Result;
use crate::layout::{self, CutPointSelector, HeightEstimator};
use crate::ReflowConfig;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Cut point for rendered block heights; `-1` when no split is safe
#[wasm_bindgen(js_name = selectCutPoint)]
pub fn select_cut_point(heights: &[f32], visible_height: f32) -> i32 {
    CutPointSelector::default()
        .select(heights, visible_height)
        .map_or(-1, |cut| cut as i32)
}

/// Reassign dense page orders (template JSON in, template JSON out)
#[wasm_bindgen(js_name = recalculateOrder)]
pub fn recalculate_order(template_json: &str) -> std::result::Result<String, JsError> {
    Ok(recalculate_order_json(template_json)?)
}

/// Renumber (or strip) heading prefixes per the template's numbering switch
#[wasm_bindgen(js_name = renumberHeadings)]
pub fn renumber_headings(template_json: &str) -> std::result::Result<String, JsError> {
    Ok(renumber_headings_json(template_json)?)
}

/// Reflow every page with estimated heights; `config_json` may be empty
#[wasm_bindgen(js_name = reflowTemplate)]
pub fn reflow_template(
    template_json: &str,
    config_json: &str,
    client_height: f32,
) -> std::result::Result<String, JsError> {
    Ok(reflow_template_json(template_json, config_json, client_height)?)
}

fn recalculate_order_json(template_json: &str) -> Result<String> {
    let mut template = Template::from_json(template_json)?;
    template.pages = layout::recalculate(&template.pages);
    template.to_json(false)
}

fn renumber_headings_json(template_json: &str) -> Result<String> {
    let mut template = Template::from_json(template_json)?;
    layout::renumber_template(&mut template);
    template.to_json(false)
}

fn reflow_template_json(template_json: &str, config_json: &str, client_height: f32) -> Result<String> {
    let template = Template::from_json(template_json)?;
    let config = if config_json.trim().is_empty() {
        ReflowConfig::default()
    } else {
        ReflowConfig::from_json(config_json)?
    };
    let template = crate::reflow_template(template, config, HeightEstimator::default(), client_height)?;
    template.to_json(false)
}
