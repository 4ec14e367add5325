//! Parley core: rule-based response selection and the restricted
//! arithmetic evaluator it calls.

pub mod calc;
pub mod clock;
pub mod error;
pub mod mode;
pub mod picker;
pub mod router;
pub mod rules;

pub use calc::{evaluate, Number};
pub use error::{CalcError, ParseModeError, RouteError, RuleBookError};
pub use mode::Mode;
pub use router::{respond, Reply, Responder, RuleKind};
pub use rules::RuleBook;
