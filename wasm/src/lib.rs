use serde::Deserialize;
use table_sketch::{Config, GraphPatch, Session};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditorOptions {
    origin_x: Option<f64>,
    origin_y: Option<f64>,
    spacing_x: Option<f64>,
    indent: Option<usize>,
}

fn build_config(options: EditorOptions) -> Config {
    let mut config = Config::default();
    if let Some(v) = options.origin_x {
        config.layout.origin_x = v;
    }
    if let Some(v) = options.origin_y {
        config.layout.origin_y = v;
    }
    if let Some(v) = options.spacing_x {
        config.layout.spacing_x = v;
    }
    if let Some(v) = options.indent {
        config.codec.indent = v;
    }
    config
}

/// Editing session handed to the browser host. The host forwards text edits
/// and diagram events and reads back the text, graph and last error.
#[wasm_bindgen]
pub struct EditorSession {
    inner: Option<Session>,
}

const CLOSED: &str = "session is closed";

impl EditorSession {
    fn try_update(&mut self, f: impl FnOnce(Session) -> Session) -> Result<(), &'static str> {
        let session = self.inner.take().ok_or(CLOSED)?;
        self.inner = Some(f(session));
        Ok(())
    }

    fn update(&mut self, f: impl FnOnce(Session) -> Session) -> Result<(), JsValue> {
        self.try_update(f).map_err(JsValue::from_str)
    }

    fn session(&self) -> Result<&Session, JsValue> {
        self.inner.as_ref().ok_or_else(|| JsValue::from_str(CLOSED))
    }
}

#[wasm_bindgen]
impl EditorSession {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str, options_json: Option<String>) -> Result<EditorSession, JsValue> {
        let options = if let Some(raw_options) = options_json {
            serde_json::from_str::<EditorOptions>(&raw_options)
                .map_err(|error| JsValue::from_str(&error.to_string()))?
        } else {
            EditorOptions::default()
        };
        Ok(Self {
            inner: Some(Session::open_with(text, build_config(options))),
        })
    }

    #[wasm_bindgen(js_name = applyText)]
    pub fn apply_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.update(|session| session.apply_text_change(text))
    }

    /// `patch_json` is a tagged patch, e.g.
    /// `{"type": "node_moved", "id": "order", "position": {"x": 50, "y": 60}}`.
    #[wasm_bindgen(js_name = applyPatch)]
    pub fn apply_patch(&mut self, patch_json: &str) -> Result<(), JsValue> {
        let patch: GraphPatch = serde_json::from_str(patch_json)
            .map_err(|error| JsValue::from_str(&error.to_string()))?;
        self.update(|session| session.apply_graph_patch(patch))
    }

    pub fn publish(&mut self) -> Result<(), JsValue> {
        self.update(Session::publish)
    }

    pub fn text(&self) -> Result<String, JsValue> {
        Ok(self.session()?.text().to_string())
    }

    #[wasm_bindgen(js_name = graphJson)]
    pub fn graph_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session()?.graph())
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    #[wasm_bindgen(js_name = errorText)]
    pub fn error_text(&self) -> Option<String> {
        self.inner
            .as_ref()
            .and_then(|session| session.last_error())
            .map(|error| error.to_string())
    }

    #[wasm_bindgen(js_name = hasUnpublishedEdits)]
    pub fn has_unpublished_edits(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(Session::has_unpublished_edits)
    }

    /// Ends the session and returns its final text.
    pub fn close(&mut self) -> Option<String> {
        self.inner.take().map(Session::close)
    }
}
