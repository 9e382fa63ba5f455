// src/noyau/exposants.rs
//
// Exposants Unicode <-> chiffres ASCII
// ------------------------------------
// - table fixe : 10 chiffres + signe moins (⁻)
// - libellés trig inverse ("sin⁻¹", ...) -> asin/acos/atan
//
// Contrat : fonctions totales. Un caractère hors table passe tel quel.

/// Chiffres exposants, indexés par valeur (0..=9).
const EXPOSANTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Signe moins en exposant.
pub const MOINS_EXPOSANT: char = '⁻';

/// Libellés affichés sur le pavé pour les fonctions inverses, avec leur nom ASCII.
/// L’ordre n’a pas d’importance (libellés disjoints), mais la table est figée.
pub const LIBELLES_TRIG_INVERSE: [(&str, &str); 3] =
    [("sin⁻¹", "asin"), ("cos⁻¹", "acos"), ("tan⁻¹", "atan")];

/// Chiffre ASCII -> exposant. Hors '0'..='9' : le caractère revient inchangé.
pub fn vers_exposant(c: char) -> char {
    match c.to_digit(10) {
        Some(d) if c.is_ascii_digit() => EXPOSANTS[d as usize],
        _ => c,
    }
}

/// Exposant -> chiffre ASCII ('0'..='9') ou '-' pour ⁻. None si hors table.
pub fn depuis_exposant(c: char) -> Option<char> {
    if c == MOINS_EXPOSANT {
        return Some('-');
    }
    EXPOSANTS
        .iter()
        .position(|&e| e == c)
        .and_then(|i| char::from_digit(i as u32, 10))
}

/// Vrai si `c` appartient à la table (chiffre exposant ou ⁻).
pub fn est_exposant(c: char) -> bool {
    depuis_exposant(c).is_some()
}

/// "sin⁻¹" -> "asin", "cos⁻¹" -> "acos", "tan⁻¹" -> "atan".
///
/// Doit passer AVANT tout décodage d’exposant : le libellé contient lui-même "⁻¹".
pub fn normaliser_trig_inverse(texte: &str) -> String {
    let mut out = texte.to_string();
    for (libelle, nom) in LIBELLES_TRIG_INVERSE {
        if out.contains(libelle) {
            out = out.replace(libelle, nom);
        }
    }
    out
}

/// Décode les exposants restants.
///
/// Chaque suite contiguë d’exposants devient un opérateur puissance explicite :
/// "x²" -> "x^2", "10⁻³" -> "10^-3", "x²³" -> "x^23".
///
/// Écart voulu avec un décodage en chiffres simples ("x²" -> "x2") : le '^'
/// inséré ici devient "**" à l’étape puissance, qui passe après celle-ci.
pub fn decoder_exposants(texte: &str) -> String {
    let mut out = String::with_capacity(texte.len());
    let mut dans_suite = false;

    for c in texte.chars() {
        match depuis_exposant(c) {
            Some(ascii) => {
                if !dans_suite {
                    out.push('^');
                    dans_suite = true;
                }
                out.push(ascii);
            }
            None => {
                dans_suite = false;
                out.push(c);
            }
        }
    }
    out
}
