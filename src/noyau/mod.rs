//! Noyau de notation (pur, sans UI, sans réseau)
//!
//! Organisation interne :
//! - exposants.rs     : chiffres <-> exposants Unicode, libellés trig inverse
//! - signe.rs         : touche ± (signe du terme final)
//! - normalisation.rs : tampon -> forme canonique du solveur (étapes ordonnées)
//! - clavier.rs       : pavé virtuel (tampon, mémoire, exposant attendu)
//! - jetons.rs        : tokenisation (évaluateur flottant)
//! - rpn.rs           : shunting-yard
//! - eval.rs          : évaluation flottante d’une variable
//! - graphe.rs        : échantillonnage [-10, 10] pas 0.5

pub mod clavier;
pub mod eval;
pub mod exposants;
pub mod graphe;
pub mod jetons;
pub mod normalisation;
pub mod rpn;
pub mod signe;

#[cfg(test)]
mod tests_normalisation;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use clavier::{Clavier, Effet, Touche};
pub use eval::EvaluateurFlottant;
pub use graphe::{graphe_du_tampon, SerieGraphe};
pub use normalisation::{normaliser, Mode};
