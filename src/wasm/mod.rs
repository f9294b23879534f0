//! WASM bindings for the paginator

pub mod flat_buffer;

use crate::document::{ContentBlock, LayoutNode};
use crate::error::{Error, Result};
use crate::layout::{calculate_break_points, PageBreakConfig, PageBreakResult, PageSlice};
use crate::render::PdfRendererOptions;
use crate::{Pagination, Paginator};
use flat_buffer::SliceBuffer;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed paginator wrapper
#[wasm_bindgen]
pub struct WasmPaginator {
    paginator: Paginator,
    options: PdfRendererOptions,
    buffer: SliceBuffer,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator for A4 pages with default margins
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            paginator: Paginator::default(),
            options: PdfRendererOptions::default(),
            buffer: SliceBuffer::new(),
        }
    }

    /// Create a paginator from a JSON `PageBreakConfig`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> std::result::Result<WasmPaginator, JsValue> {
        let config = parse_config(config_json).map_err(to_js_error)?;
        Ok(Self {
            paginator: Paginator::new(config),
            options: PdfRendererOptions::from_config(&config),
            buffer: SliceBuffer::new(),
        })
    }

    /// Set the rasterization scale used for slices; must be positive
    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, scale: f32) -> std::result::Result<(), JsValue> {
        let options = self.options.with_scale(scale);
        options.validate().map_err(to_js_error)?;
        self.options = options;
        Ok(())
    }

    /// Paginate a JSON layout tree; returns blocks, result and slices as JSON
    #[wasm_bindgen(js_name = paginateTree)]
    pub fn paginate_tree(&mut self, tree_json: &str) -> std::result::Result<String, JsValue> {
        let root: LayoutNode = serde_json::from_str(tree_json)
            .map_err(|e| to_js_error(e.into()))?;
        let scale = self.options.scale;
        let pagination = self.paginator.paginate(&root);
        PaginationReport::new(pagination, scale)
            .to_json()
            .map_err(to_js_error)
    }

    /// Compute break points for a JSON array of content blocks
    #[wasm_bindgen(js_name = calculateBreakPoints)]
    pub fn calculate_break_points(&self, blocks_json: &str) -> std::result::Result<String, JsValue> {
        breaks_for_json(blocks_json, self.paginator.config()).map_err(to_js_error)
    }

    /// Paginate a JSON layout tree into the flat buffer; returns the page count
    #[wasm_bindgen(js_name = fillSliceBuffer)]
    pub fn fill_slice_buffer(&mut self, tree_json: &str) -> std::result::Result<usize, JsValue> {
        let root: LayoutNode = serde_json::from_str(tree_json)
            .map_err(|e| to_js_error(e.into()))?;
        let scale = self.options.scale;
        let pagination = self.paginator.paginate(&root);
        self.buffer.fill(pagination, scale);
        Ok(pagination.page_count())
    }

    /// Break points of the last pass as a typed array
    #[wasm_bindgen(js_name = getBreakPoints)]
    pub fn get_break_points(&self) -> js_sys::Float32Array {
        let points = self.last_break_points();
        js_sys::Float32Array::from(points.as_slice())
    }

    /// Get page count of the last pass
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.paginator.page_count()
    }

    /// Get renderer options (returns JSON)
    #[wasm_bindgen(js_name = getRendererOptions)]
    pub fn get_renderer_options(&self) -> String {
        serde_json::to_string(&self.options).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = sliceU32Ptr)]
    pub fn slice_u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = sliceU32Len)]
    pub fn slice_u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = sliceF32Ptr)]
    pub fn slice_f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(js_name = sliceF32Len)]
    pub fn slice_f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }
}

impl WasmPaginator {
    /// Break points as computed, `[0]` before any pass
    fn last_break_points(&self) -> Vec<f32> {
        match self.paginator.last() {
            Some(pagination) => pagination.result.break_points.clone(),
            None => PageBreakResult::default().break_points,
        }
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable pagination report for JS
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReport<'a> {
    pub blocks: &'a [ContentBlock],
    pub break_points: &'a [f32],
    pub page_count: usize,
    pub warnings: &'a [String],
    pub total_height: f32,
    pub slices: Vec<PageSlice>,
}

impl<'a> PaginationReport<'a> {
    pub fn new(pagination: &'a Pagination, scale: f32) -> Self {
        Self {
            blocks: &pagination.blocks,
            break_points: &pagination.result.break_points,
            page_count: pagination.result.page_count,
            warnings: &pagination.result.warnings,
            total_height: pagination.total_height,
            slices: pagination.slices(scale),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn parse_config(config_json: &str) -> Result<PageBreakConfig> {
    let config: PageBreakConfig = serde_json::from_str(config_json)?;
    config.validate()?;
    Ok(config)
}

fn breaks_for_json(blocks_json: &str, config: &PageBreakConfig) -> Result<String> {
    let mut blocks: Vec<ContentBlock> = serde_json::from_str(blocks_json)?;
    blocks.sort_by(|a, b| a.top.total_cmp(&b.top));
    let result: PageBreakResult = calculate_break_points(&blocks, config);
    Ok(serde_json::to_string(&result)?)
}

fn to_js_error(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_rejects_bad_margin() {
        assert!(parse_config(r#"{"marginMm": 200}"#).is_err());
        assert!(parse_config("{}").is_ok());
    }

    #[test]
    fn test_breaks_for_json_sorts_input() {
        let json = r#"[
            {"id": 2, "type": "section-item", "top": 981.81, "height": 200, "canBreak": true, "mustKeepWithNext": false},
            {"id": 1, "type": "section-item", "top": 0, "height": 981.81, "canBreak": true, "mustKeepWithNext": false}
        ]"#;
        let out = breaks_for_json(json, &PageBreakConfig::default()).unwrap();
        let result: PageBreakResult = serde_json::from_str(&out).unwrap();
        assert_eq!(result.page_count, 2);
        assert_eq!(result.break_points[1], 981.81);
    }

    #[test]
    fn test_report_json_shape() {
        let mut paginator = Paginator::default();
        let pagination = paginator.paginate(&LayoutNode::default());
        let json = PaginationReport::new(pagination, 3.0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pageCount"], 1);
        assert_eq!(value["breakPoints"][0], 0.0);
        assert_eq!(value["slices"].as_array().map(Vec::len), Some(1));
    }

    const TWO_PAGES: &str = r#"{"bounds":{"x":0,"y":0,"width":700,"height":1600},"children":[
        {"classes":["resume-section"],"bounds":{"x":0,"y":0,"width":700,"height":1600},"children":[
            {"classes":["section-header"],"bounds":{"x":0,"y":0,"width":700,"height":30}},
            {"classes":["section-item"],"bounds":{"x":0,"y":30,"width":700,"height":700.5}},
            {"classes":["section-item"],"bounds":{"x":0,"y":730.5,"width":700,"height":869.5}}
        ]}
    ]}"#;

    #[test]
    fn test_break_points_follow_paginate_tree() {
        let mut wasm = WasmPaginator::new();
        assert_eq!(wasm.last_break_points(), vec![0.0]);

        let json = wasm.paginate_tree(TWO_PAGES).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        let points = wasm.last_break_points();

        assert_eq!(wasm.get_page_count(), 2);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], 730.5_f32);
        assert_eq!(report["breakPoints"][1].as_f64(), Some(f64::from(points[1])));
    }

    #[test]
    fn test_break_points_independent_of_scale() {
        let mut wasm = WasmPaginator::new();
        assert!(wasm.set_scale(0.7).is_ok());
        wasm.fill_slice_buffer(TWO_PAGES).unwrap();
        assert_eq!(wasm.last_break_points(), vec![0.0, 730.5]);
        assert_eq!(wasm.options.scale, 0.7);
    }

    #[test]
    fn test_slice_buffer_fill() {
        let mut wasm = WasmPaginator::new();
        assert!(wasm.set_scale(2.0).is_ok());
        let tree = r#"{"bounds":{"x":0,"y":0,"width":600,"height":500},"children":[
            {"classes":["resume-section"],"bounds":{"x":0,"y":0,"width":600,"height":500}}
        ]}"#;
        assert_eq!(wasm.fill_slice_buffer(tree).unwrap(), 1);
        assert_eq!(wasm.last_break_points(), vec![0.0]);
        assert_eq!(wasm.slice_u32_len() as usize, flat_buffer::HEADER_SIZE + flat_buffer::U32_PER_BLOCK);
    }
}
