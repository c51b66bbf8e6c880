pub mod blend;
pub mod monte_carlo;
pub mod pipeline;
pub mod poisson;
pub mod volatility;
