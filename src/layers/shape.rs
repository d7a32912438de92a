//! Shape hints and dimension resolution for layers.

use crate::errors::LayerError;

/// Optional shape hints for a layer, resolved to concrete dimensions at
/// initialization time.
///
/// A layer is *elementwise* when it applies no projection: its output
/// dimension equals its input dimension and it is explicitly marked so. For
/// an elementwise layer a single hint (either side) is enough; a dense layer
/// needs both, either from explicit hints or from the surrounding
/// [`crate::stack::StackConfig`] inference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerShape {
    /// Input dimension hint, if known.
    pub dim_in: Option<usize>,
    /// Output dimension hint, if known.
    pub dim_out: Option<usize>,
    /// Marks the layer as elementwise (no weight matrix).
    pub elementwise: bool,
}

impl LayerShape {
    /// Creates a shape with both dimensions known.
    pub fn new(dim_in: usize, dim_out: usize) -> Self {
        Self {
            dim_in: Some(dim_in),
            dim_out: Some(dim_out),
            elementwise: false,
        }
    }

    /// Creates an elementwise shape with the given dimension.
    pub fn elementwise(dim: usize) -> Self {
        Self {
            dim_in: Some(dim),
            dim_out: Some(dim),
            elementwise: true,
        }
    }

    /// Returns true if this shape is marked elementwise.
    pub fn is_elementwise(&self) -> bool {
        self.elementwise
    }

    /// Resolves the hints into concrete `(dim_in, dim_out)` dimensions.
    ///
    /// Elementwise shapes accept a single hint and mirror it to the other
    /// side; conflicting hints are an error. Dense shapes require both.
    pub fn resolve(&self) -> Result<(usize, usize), LayerError> {
        if self.elementwise {
            match (self.dim_in, self.dim_out) {
                (Some(din), Some(dout)) if din != dout => Err(LayerError::ShapeMismatch {
                    expected: din,
                    actual: dout,
                }),
                (Some(dim), _) | (_, Some(dim)) => Ok((dim, dim)),
                (None, None) => Err(LayerError::UnresolvedShape {
                    message: "elementwise layer needs a dimension hint".to_string(),
                }),
            }
        } else {
            match (self.dim_in, self.dim_out) {
                (Some(din), Some(dout)) => Ok((din, dout)),
                (None, _) => Err(LayerError::UnresolvedShape {
                    message: "input dimension is unknown".to_string(),
                }),
                (_, None) => Err(LayerError::UnresolvedShape {
                    message: "output dimension is unknown".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_shape_resolution() {
        let shape = LayerShape::new(4, 2);
        assert_eq!(shape.resolve().unwrap(), (4, 2));
        assert!(!shape.is_elementwise());
    }

    #[test]
    fn test_dense_shape_requires_both_dims() {
        let shape = LayerShape {
            dim_in: Some(4),
            dim_out: None,
            elementwise: false,
        };
        assert!(matches!(
            shape.resolve(),
            Err(LayerError::UnresolvedShape { .. })
        ));

        let shape = LayerShape {
            dim_in: None,
            dim_out: Some(2),
            elementwise: false,
        };
        assert!(matches!(
            shape.resolve(),
            Err(LayerError::UnresolvedShape { .. })
        ));
    }

    #[test]
    fn test_elementwise_shape_mirrors_single_hint() {
        let shape = LayerShape {
            dim_in: Some(3),
            dim_out: None,
            elementwise: true,
        };
        assert_eq!(shape.resolve().unwrap(), (3, 3));

        let shape = LayerShape {
            dim_in: None,
            dim_out: Some(5),
            elementwise: true,
        };
        assert_eq!(shape.resolve().unwrap(), (5, 5));
    }

    #[test]
    fn test_elementwise_shape_rejects_conflicting_hints() {
        let shape = LayerShape {
            dim_in: Some(3),
            dim_out: Some(4),
            elementwise: true,
        };
        assert!(matches!(
            shape.resolve(),
            Err(LayerError::ShapeMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_elementwise_shape_requires_a_hint() {
        let shape = LayerShape {
            dim_in: None,
            dim_out: None,
            elementwise: true,
        };
        assert!(matches!(
            shape.resolve(),
            Err(LayerError::UnresolvedShape { .. })
        ));
    }
}
