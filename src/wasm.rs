use crate::{jenks_breaks, JenksErr};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

// Convert breaks to an Array suitable for use by a JS function
pub fn breaks_to_js_array(data: Vec<f64>) -> Array {
    let array = Array::new();
    for num in data {
        array.push(&JsValue::from_f64(num));
    }
    array
}

fn breaks(data: &[f64], nclasses: u32) -> Result<Vec<f64>, JenksErr> {
    jenks_breaks(data, usize::try_from(nclasses)?)
}

#[wasm_bindgen]
pub fn jenks_wasm(data: &[f64], nclasses: u32) -> Result<Array, JsError> {
    let res = breaks(data, nclasses).map_err(|err| JsError::new(&err.to_string()))?;
    Ok(breaks_to_js_array(res))
}
