//! Uniform values and the sink trait shader backends implement

use std::fmt;

use glam::{Mat4, Vec3};
use hashbrown::HashMap;

/// A single value written to a named shader uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Scalar int (also used for sampler units)
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl fmt::Display for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Int(v) => write!(f, "int {v}"),
            UniformValue::Float(v) => write!(f, "float {v:.6}"),
            UniformValue::Vec3(v) => write!(f, "vec3 ({:.6}, {:.6}, {:.6})", v.x, v.y, v.z),
            UniformValue::Mat4(m) => {
                // Column-major, one column per group
                write!(f, "mat4 [")?;
                for (i, col) in m.to_cols_array_2d().iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{:.4} {:.4} {:.4} {:.4}", col[0], col[1], col[2], col[3])?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Receiver for named uniform writes
///
/// Implemented by the shader subsystem; everything in this crate only talks to
/// the trait.
pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }
}

/// In-memory uniform table
///
/// Later writes to the same name replace earlier ones, like a real program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformMap {
    values: HashMap<String, UniformValue>,
}

impl UniformMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(v) => Some(v),
            _ => None,
        }
    }

    /// Entries sorted by name
    pub fn sorted(&self) -> Vec<(&str, UniformValue)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl UniformSink for UniformMap {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.values.insert(name.to_string(), value);
    }
}
