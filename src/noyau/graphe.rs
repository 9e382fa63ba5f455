// src/noyau/graphe.rs
//
// Échantillonnage du graphe : x ∈ [-10, 10], pas 0.5 => 41 points.
// Un point qui échoue (erreur, NaN, ±∞) vaut None ; il n’interrompt jamais la série.
// Série entièrement None => pas de série du tout.
//
// Sans état : rien à verrouiller, appelable autant de fois qu’on veut.

use tracing::trace;

use super::eval::Evaluateur;

pub const X_MIN: f64 = -10.0;
pub const X_MAX: f64 = 10.0;
pub const PAS: f64 = 0.5;

/// Nombre de points de la grille (bornes incluses).
pub const NB_POINTS: usize = 41;

/// Série échantillonnée (au moins un point défini).
#[derive(Clone, Debug, PartialEq)]
pub struct SerieGraphe {
    pub libelle: String,
    pub points: Vec<(f64, Option<f64>)>,
}

impl SerieGraphe {
    /// Bornes en y des points définis (pour le cadrage de l’affichage).
    pub fn bornes_y(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|(_, y)| *y)
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

/// Abscisses de la grille : calculées par index (pas d’accumulation d’erreur).
pub fn abscisses() -> impl Iterator<Item = f64> {
    (0..NB_POINTS).map(|i| X_MIN + i as f64 * PAS)
}

/// Tampon brut -> expression pour l’évaluateur : partie avant '=', ** -> ^.
pub fn preparer_expression(tampon: &str) -> String {
    let gauche = tampon.split('=').next().unwrap_or_default();
    gauche.replace("**", "^")
}

/// Échantillonne `expression` (déjà préparée) sur la grille fixe.
pub fn echantillonner(
    expression: &str,
    variable: &str,
    evaluateur: &dyn Evaluateur,
) -> Option<SerieGraphe> {
    let points: Vec<(f64, Option<f64>)> = abscisses()
        .map(|x| {
            let y = match evaluateur.evaluer(expression, variable, x) {
                Ok(v) if v.is_finite() => Some(v),
                Ok(v) => {
                    trace!(x, y = v, "point non fini");
                    None
                }
                Err(e) => {
                    trace!(x, erreur = %e, "point indéfini");
                    None
                }
            };
            (x, y)
        })
        .collect();

    if points.iter().all(|(_, y)| y.is_none()) {
        return None;
    }

    Some(SerieGraphe {
        libelle: format!("f({variable}) = {expression}"),
        points,
    })
}

/// Raccourci : tampon brut + variable -> série.
pub fn graphe_du_tampon(
    tampon: &str,
    variable: &str,
    evaluateur: &dyn Evaluateur,
) -> Option<SerieGraphe> {
    if tampon.trim().is_empty() {
        return None;
    }
    echantillonner(&preparer_expression(tampon), variable, evaluateur)
}
