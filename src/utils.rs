use crate::errors::InfluenceError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), InfluenceError> {
    if value.is_nan() || value <= 0.0 || value.is_infinite() {
        Err(InfluenceError::InvalidParameter(
            parameter.to_string(),
            "finite real value greater than 0".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), InfluenceError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(InfluenceError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_int_parameter(value: usize, parameter: &str) -> Result<(), InfluenceError> {
    if value == 0 {
        Err(InfluenceError::InvalidParameter(
            parameter.to_string(),
            "integer greater than 0".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Check that a collection has the expected length.
#[inline]
pub fn validate_len(name: &str, expected: usize, found: usize) -> Result<(), InfluenceError> {
    if expected == found {
        Ok(())
    } else {
        Err(InfluenceError::DimensionMismatch(name.to_string(), expected, found))
    }
}

/// Convert Log odds to probability
#[inline]
pub fn odds(v: f64) -> f64 {
    1. / (1. + (-v).exp())
}

/// Number of worker threads to use, all available cores when not set.
pub fn resolve_num_threads(num_threads: Option<usize>) -> usize {
    match num_threads {
        Some(n) => n,
        None => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
    }
}

/// Build the rayon pool shared by both evaluation phases.
pub fn build_thread_pool(num_threads: Option<usize>) -> Result<rayon::ThreadPool, InfluenceError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(resolve_num_threads(num_threads))
        .build()
        .map_err(|e| InfluenceError::ThreadPool(e.to_string()))
}
