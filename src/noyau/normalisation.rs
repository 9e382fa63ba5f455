// src/noyau/normalisation.rs
//
// Tampon (notation utilisateur) -> chaîne canonique pour le solveur distant.
//
// Pipeline en étapes nommées, ORDONNÉES (chaque étape suppose les précédentes faites) :
//   1. marqueur   : retire les □ non résolus
//   2. exposants  : "sin⁻¹" -> asin, puis suites d’exposants -> ^n
//   3. puissance  : ^ -> **
//   4. pi         : π -> pi, 2pi -> 2*pi, pi2 -> pi*2
//   5. e          : 2e -> 2*e, e2 -> e*2
//   6. factorielle: 5! -> factorial(5)  (un seul chiffre, volontairement)
//   7. pourcent   : 7%3 -> (7/100)*3, puis 7% -> (7/100)
//   8. espaces    : supprimés
//   9. combinatoire: 4C2 -> nCr(4,2), 4P2 -> nPr(4,2)
//  10. produit    : × -> * (et x -> * en mode arithmétique)
//
// Contrat : fonction pure et totale. Un fragment illisible passe tel quel,
// c’est au solveur distant de le refuser.

use std::sync::LazyLock;

use regex::Regex;

use super::clavier::{MARQUEUR_EXPOSANT, SYMBOLE_PRODUIT};
use super::exposants::{decoder_exposants, normaliser_trig_inverse};

/// Mode de saisie : décide du sens de la lettre `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Algèbre / calcul / trigo : `x` est une variable.
    #[default]
    Symbolique,
    /// Calcul rapide : pas de variable libre, `x` signifie « fois ».
    Arithmetique,
}

/// Une étape de réécriture.
#[derive(Clone, Copy)]
pub struct Etape {
    pub nom: &'static str,
    pub appliquer: fn(&str, Mode) -> String,
}

impl std::fmt::Debug for Etape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Etape").field("nom", &self.nom).finish()
    }
}

/// Ordre = contrat.
pub const ETAPES: [Etape; 10] = [
    Etape { nom: "marqueur", appliquer: etape_marqueur },
    Etape { nom: "exposants", appliquer: etape_exposants },
    Etape { nom: "puissance", appliquer: etape_puissance },
    Etape { nom: "pi", appliquer: etape_pi },
    Etape { nom: "e", appliquer: etape_e },
    Etape { nom: "factorielle", appliquer: etape_factorielle },
    Etape { nom: "pourcent", appliquer: etape_pourcent },
    Etape { nom: "espaces", appliquer: etape_espaces },
    Etape { nom: "combinatoire", appliquer: etape_combinatoire },
    Etape { nom: "produit", appliquer: etape_produit },
];

/// API publique : tampon brut -> forme canonique.
pub fn normaliser(tampon: &str, mode: Mode) -> String {
    ETAPES
        .iter()
        .fold(tampon.to_string(), |acc, etape| (etape.appliquer)(&acc, mode))
}

/// Même pipeline, avec la sortie de chaque étape (panneau « Démarche »).
pub fn normaliser_detaille(tampon: &str, mode: Mode) -> Vec<(&'static str, String)> {
    let mut courant = tampon.to_string();
    let mut trace = Vec::with_capacity(ETAPES.len());
    for etape in &ETAPES {
        courant = (etape.appliquer)(&courant, mode);
        trace.push((etape.nom, courant.clone()));
    }
    trace
}

/* ------------------------ Motifs (compilés une fois) ------------------------ */

fn motif(source: &str) -> Regex {
    Regex::new(source).expect("motif de normalisation invalide")
}

static CHIFFRE_PI: LazyLock<Regex> = LazyLock::new(|| motif(r"([0-9])pi"));
static PI_CHIFFRE: LazyLock<Regex> = LazyLock::new(|| motif(r"pi([0-9])"));
static CHIFFRE_E: LazyLock<Regex> = LazyLock::new(|| motif(r"([0-9])e"));
static E_CHIFFRE: LazyLock<Regex> = LazyLock::new(|| motif(r"e([0-9])"));
static FACTORIELLE: LazyLock<Regex> = LazyLock::new(|| motif(r"([0-9])!"));
static POURCENT_DE: LazyLock<Regex> =
    LazyLock::new(|| motif(r"([0-9]+\.?[0-9]*)%([0-9]+\.?[0-9]*)"));
// pas de lookahead dans `regex` : le caractère suivant (non chiffre) est capturé puis recopié
static POURCENT_SEUL: LazyLock<Regex> =
    LazyLock::new(|| motif(r"([0-9]+\.?[0-9]*)%([^0-9]|$)"));
static ESPACES: LazyLock<Regex> = LazyLock::new(|| motif(r"\s+"));
static COMBINAISON: LazyLock<Regex> = LazyLock::new(|| motif(r"([0-9]+)C([0-9]+)"));
static PERMUTATION: LazyLock<Regex> = LazyLock::new(|| motif(r"([0-9]+)P([0-9]+)"));

/* ------------------------ Étapes ------------------------ */

fn etape_marqueur(s: &str, _mode: Mode) -> String {
    s.replace(MARQUEUR_EXPOSANT, "")
}

fn etape_exposants(s: &str, _mode: Mode) -> String {
    decoder_exposants(&normaliser_trig_inverse(s))
}

fn etape_puissance(s: &str, _mode: Mode) -> String {
    s.replace('^', "**")
}

fn etape_pi(s: &str, _mode: Mode) -> String {
    let s = s.replace('π', "pi");
    let s = CHIFFRE_PI.replace_all(&s, "${1}*pi");
    PI_CHIFFRE.replace_all(&s, "pi*${1}").into_owned()
}

fn etape_e(s: &str, _mode: Mode) -> String {
    let s = CHIFFRE_E.replace_all(s, "${1}*e");
    E_CHIFFRE.replace_all(&s, "e*${1}").into_owned()
}

fn etape_factorielle(s: &str, _mode: Mode) -> String {
    FACTORIELLE.replace_all(s, "factorial(${1})").into_owned()
}

fn etape_pourcent(s: &str, _mode: Mode) -> String {
    let s = POURCENT_DE.replace_all(s, "(${1}/100)*${2}");
    POURCENT_SEUL.replace_all(&s, "(${1}/100)${2}").into_owned()
}

fn etape_espaces(s: &str, _mode: Mode) -> String {
    ESPACES.replace_all(s, "").into_owned()
}

fn etape_combinatoire(s: &str, _mode: Mode) -> String {
    let s = COMBINAISON.replace_all(s, "nCr(${1},${2})");
    PERMUTATION.replace_all(&s, "nPr(${1},${2})").into_owned()
}

fn etape_produit(s: &str, mode: Mode) -> String {
    match mode {
        Mode::Arithmetique => s.replace([SYMBOLE_PRODUIT, 'x'], "*"),
        Mode::Symbolique => s.replace(SYMBOLE_PRODUIT, "*"),
    }
}
