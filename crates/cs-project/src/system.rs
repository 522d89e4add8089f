//! Static dispatch from a configured system to its vector field.

use cs_sim::{DisturbedLorenz, Lorenz, VectorField, Yang};

use crate::schema::SystemDef;

/// Work that is generic over the concrete vector field.
///
/// [`SystemDef::visit`] picks the variant once and monomorphizes the whole
/// run for it, so no call inside the run goes through a vtable.
pub trait FieldVisitor {
    type Output;

    fn visit<F: VectorField>(self, field: &F) -> Self::Output;
}

impl SystemDef {
    pub fn visit<V: FieldVisitor>(&self, visitor: V) -> V::Output {
        match *self {
            SystemDef::Lorenz => visitor.visit(&Lorenz),
            SystemDef::Yang => visitor.visit(&Yang),
            SystemDef::DisturbedLorenz { sigma, rho, beta } => {
                visitor.visit(&DisturbedLorenz::new(sigma, rho, beta))
            }
        }
    }

    pub fn dim(&self) -> usize {
        struct Dim;
        impl FieldVisitor for Dim {
            type Output = usize;
            fn visit<F: VectorField>(self, field: &F) -> usize {
                field.dim()
            }
        }
        self.visit(Dim)
    }

    pub fn param_names(&self) -> Vec<&'static str> {
        struct Names;
        impl FieldVisitor for Names {
            type Output = Vec<&'static str>;
            fn visit<F: VectorField>(self, field: &F) -> Vec<&'static str> {
                field.param_names().to_vec()
            }
        }
        self.visit(Names)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemDef::Lorenz => "Lorenz",
            SystemDef::Yang => "Yang",
            SystemDef::DisturbedLorenz { .. } => "Disturbed Lorenz",
        }
    }
}
