use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod error;
pub mod pv;
pub mod state;
pub mod types;

pub use ai::Algorithm;
pub use ai::cache::{Bound, CacheConfig, TranspositionCache};
pub use ai::search::{SCORE_BOUND, Searcher};
pub use error::{CacheError, SolverError};
pub use pv::{PV_SENTINEL, PrincipalVariation, RunOptions, run};
pub use state::GameState;
pub use types::{Color, PositionReport, PvReport, SearchStats};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Walks a `-1`-terminated PV backwards with algorithm `1`-`4`.
/// `options` may be `undefined` or a partial `RunOptions` object.
#[wasm_bindgen(js_name = evaluatePv)]
pub fn evaluate_pv(moves: Vec<i32>, algorithm: u8, options: JsValue) -> Result<JsValue, JsValue> {
    let algorithm = Algorithm::from_id(algorithm).map_err(to_js_error)?;
    let pv = PrincipalVariation::from_terminated(&moves).map_err(to_js_error)?;
    let options: RunOptions = if options.is_undefined() || options.is_null() {
        RunOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };

    let report = run(&pv, algorithm, &options);
    Ok(serde_wasm_bindgen::to_value(&report)?)
}

/// Legal squares for `color` (`1` Black, `-1` White) after replaying `moves`.
#[wasm_bindgen(js_name = legalMoves)]
pub fn legal_moves(moves: Vec<i32>, color: i32) -> Result<Vec<u8>, JsValue> {
    let color = Color::from_sign(color).ok_or_else(|| JsValue::from_str("color must be 1 or -1"))?;
    let pv = PrincipalVariation::from_squares(&moves).map_err(to_js_error)?;
    Ok(pv.final_state().get_moves(color))
}

fn to_js_error(err: SolverError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
