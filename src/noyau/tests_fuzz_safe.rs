//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pavé et la normalisation sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - longueur bornée
//! - budget temps global
//! - invariants clés :
//!   * ± appliqué deux fois rend le tampon d’origine
//!   * la forme canonique ne contient plus ni □, ni exposant, ni ×
//!   * l’échantillonneur rend toujours 41 points (ou rien)

use std::time::{Duration, Instant};

use super::clavier::{Clavier, Touche, MARQUEUR_EXPOSANT, SYMBOLE_PRODUIT};
use super::eval::EvaluateurFlottant;
use super::exposants::est_exposant;
use super::graphe::{echantillonner, preparer_expression, NB_POINTS};
use super::normalisation::{normaliser, Mode};
use super::signe::inverser_signe;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération (bornée) ------------------------ */

/// Tout le pavé (sauf C et =, qui sortent du tampon).
const TOUCHES: [&str; 36] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ".", "+", "-", "×", "/", "(", ")", "⌫",
    "sin", "cos", "tan", "asin", "acos", "atan", "log", "ln", "√", "xʸ", "π", "e", "±", "%",
    "x!", "nPr", "nCr", "x",
];

/// Caractères "bruts" (édition libre du champ texte).
const CARACTERES: [char; 16] = [
    '1', '7', '-', '-', '.', '(', ')', 'x', '²', '⁻', '□', '×', '%', '!', ' ', 'π',
];

fn gen_sequence(rng: &mut Rng, longueur: usize) -> Clavier {
    let mut c = Clavier::default();
    for _ in 0..longueur {
        let l = TOUCHES[rng.pick(TOUCHES.len() as u32) as usize];
        c.appliquer(&Touche::depuis_libelle(l), None);
    }
    c
}

fn gen_texte(rng: &mut Rng, longueur: usize) -> String {
    (0..longueur)
        .map(|_| CARACTERES[rng.pick(CARACTERES.len() as u32) as usize])
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_signe_involution() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);

    let mut rng = Rng::new(0xC0FFEE_u64);

    for k in 0..400 {
        budget(t0, max);

        let s = gen_texte(&mut rng, k % 12);
        let une_fois = inverser_signe(&s);
        assert_ne!(une_fois, s, "± sans effet: {s:?}");
        assert_eq!(inverser_signe(&une_fois), s, "± non involutif: {s:?}");
    }
}

#[test]
fn fuzz_safe_forme_canonique_propre() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for k in 0..200 {
        budget(t0, max);

        let c = gen_sequence(&mut rng, 1 + k % 15);
        for mode in [Mode::Symbolique, Mode::Arithmetique] {
            let canon = normaliser(c.tampon(), mode);
            assert!(
                !canon.contains(MARQUEUR_EXPOSANT)
                    && !canon.contains(SYMBOLE_PRODUIT)
                    && !canon.chars().any(est_exposant)
                    && !canon.chars().any(char::is_whitespace),
                "forme canonique sale: tampon={:?} canon={canon:?}",
                c.tampon()
            );
            // déterminisme
            assert_eq!(canon, normaliser(c.tampon(), mode));
        }
    }
}

#[test]
fn fuzz_safe_drapeau_exposant_coherent() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut rng = Rng::new(0x5EED_u64);

    for k in 0..200 {
        budget(t0, max);

        let c = gen_sequence(&mut rng, 1 + k % 10);
        if c.attente_exposant() {
            assert!(c.tampon().ends_with(MARQUEUR_EXPOSANT), "tampon={:?}", c.tampon());
        }
    }
}

#[test]
fn fuzz_safe_echantillonneur_ne_casse_jamais() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xFEED_u64);

    for k in 0..60 {
        budget(t0, max);

        let texte = gen_texte(&mut rng, 1 + k % 8);
        let expr = preparer_expression(&texte);
        if let Some(serie) = echantillonner(&expr, "x", &EvaluateurFlottant) {
            assert_eq!(serie.points.len(), NB_POINTS);
            assert!(serie.points.iter().any(|(_, y)| y.is_some()));
            assert!(serie
                .points
                .iter()
                .all(|(_, y)| y.map_or(true, f64::is_finite)));
        }
    }
}
