pub mod inspect;
pub mod invert;
pub mod make;
pub mod solve;
