// src/noyau/jetons.rs
//
// Tokenisation (évaluateur flottant du graphe).
// Notation acceptée = celle du tampon brut, pas la forme canonique du solveur.

use super::clavier::{MARQUEUR_EXPOSANT, SYMBOLE_PRODUIT};
use super::eval::ErreurEval;
use super::exposants::{depuis_exposant, est_exposant, MOINS_EXPOSANT};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Fonctions + variables + constantes nommées (pi, e)
    // NOTE: rpn.rs décide si c’est une fonction (suivie de '(') ou un atome.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou **

    Bang,    // ! postfixé
    Percent, // % postfixé (= /100)

    Comma,
    LPar,
    RPar,
}

impl Tok {
    /// Le jeton peut terminer une valeur ("2", "x", ")", "3!").
    fn termine_valeur(&self) -> bool {
        matches!(
            self,
            Tok::Num(_) | Tok::Ident(_) | Tok::RPar | Tok::Bang | Tok::Percent
        )
    }

    /// Le jeton peut commencer une valeur ("2", "x", "sin", "(").
    fn commence_valeur(&self) -> bool {
        matches!(self, Tok::Num(_) | Tok::Ident(_) | Tok::LPar)
    }
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (12, 1.5, .5)
/// - opérateurs + - * / ^ ** ×, postfixes ! et %
/// - parenthèses, virgule (fonctions à 2 arguments)
/// - π, identifiants [a-zA-Z_][a-zA-Z0-9_]*
/// - libellés "sin⁻¹" / "cos⁻¹" / "tan⁻¹" (=> asin / acos / atan)
/// - suites d’exposants (x² => x ^ 2, x⁻¹ => x ^ -1)
/// - √ (équivaut à ident("sqrt")), □ ignoré
///
/// Puis insère les produits implicites : "2x", "3(x+1)", "(a)(b)", "2sin(x)".
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurEval> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() || c == MARQUEUR_EXPOSANT {
            i += 1;
            continue;
        }

        match c {
            '(' => out.push(Tok::LPar),
            ')' => out.push(Tok::RPar),
            ',' => out.push(Tok::Comma),
            '+' => out.push(Tok::Plus),
            '-' => out.push(Tok::Minus),
            '/' => out.push(Tok::Slash),
            '^' => out.push(Tok::Caret),
            '!' => out.push(Tok::Bang),
            '%' => out.push(Tok::Percent),
            '*' => {
                // ** = puissance (forme Python)
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    out.push(Tok::Caret);
                    i += 1;
                } else {
                    out.push(Tok::Star);
                }
            }
            _ if c == SYMBOLE_PRODUIT => out.push(Tok::Star),
            'π' => out.push(Tok::Ident("pi".to_string())),
            '√' => out.push(Tok::Ident("sqrt".to_string())),
            _ => {
                if est_exposant(c) {
                    i = lire_exposant(&chars, i, &mut out)?;
                    continue;
                }
                if c.is_ascii_alphabetic() || c == '_' {
                    i = lire_ident(&chars, i, &mut out);
                    continue;
                }
                if c.is_ascii_digit() || c == '.' {
                    i = lire_nombre(&chars, i, &mut out)?;
                    continue;
                }
                return Err(ErreurEval::CaractereInattendu(c));
            }
        }
        i += 1;
    }

    Ok(produits_implicites(out))
}

/// Identifiant ASCII ; "sin⁻¹" est lu d’un bloc comme "asin".
fn lire_ident(chars: &[char], mut i: usize, out: &mut Vec<Tok>) -> usize {
    let start = i;
    i += 1;
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    let mot: String = chars[start..i].iter().collect();

    let inverse = matches!(mot.as_str(), "sin" | "cos" | "tan")
        && chars.get(i) == Some(&MOINS_EXPOSANT)
        && chars.get(i + 1) == Some(&'¹');

    if inverse {
        out.push(Tok::Ident(format!("a{mot}")));
        i + 2
    } else {
        out.push(Tok::Ident(mot));
        i
    }
}

fn lire_nombre(chars: &[char], mut i: usize, out: &mut Vec<Tok>) -> Result<usize, ErreurEval> {
    let start = i;
    let mut vu_point = false;
    while i < chars.len() && (chars[i].is_ascii_digit() || (chars[i] == '.' && !vu_point)) {
        if chars[i] == '.' {
            vu_point = true;
        }
        i += 1;
    }
    let txt: String = chars[start..i].iter().collect();
    let v = txt
        .parse::<f64>()
        .map_err(|_| ErreurEval::NombreInvalide(txt.clone()))?;
    out.push(Tok::Num(v));
    Ok(i)
}

/// Suite d’exposants => ^ Num (le signe ⁻ est porté par le nombre).
fn lire_exposant(chars: &[char], mut i: usize, out: &mut Vec<Tok>) -> Result<usize, ErreurEval> {
    let mut txt = String::new();
    while i < chars.len() {
        match depuis_exposant(chars[i]) {
            Some(d) => txt.push(d),
            None => break,
        }
        i += 1;
    }
    let v = txt
        .parse::<f64>()
        .map_err(|_| ErreurEval::NombreInvalide(txt.clone()))?;
    out.push(Tok::Caret);
    out.push(Tok::Num(v));
    Ok(i)
}

/// Noms suivis d’une parenthèse qui sont des appels (pas un produit implicite).
pub fn est_fonction(nom: &str) -> bool {
    matches!(
        nom,
        "sin"
            | "cos"
            | "tan"
            | "asin"
            | "acos"
            | "atan"
            | "sinh"
            | "cosh"
            | "tanh"
            | "sqrt"
            | "abs"
            | "exp"
            | "ln"
            | "log"
            | "log10"
            | "log2"
            | "floor"
            | "ceil"
            | "round"
            | "factorial"
            | "nPr"
            | "nCr"
    )
}

fn produits_implicites(jetons: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len());
    for t in jetons {
        if let Some(prev) = out.last() {
            let appel = matches!((prev, &t), (Tok::Ident(n), Tok::LPar) if est_fonction(n));
            let deux_nombres = matches!((prev, &t), (Tok::Num(_), Tok::Num(_)));
            if prev.termine_valeur() && t.commence_valeur() && !appel && !deux_nombres {
                out.push(Tok::Star);
            }
        }
        out.push(t);
    }
    out
}

/// Format utilitaire (debug) : liste de jetons en texte.
#[cfg(test)]
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Ident(name) => name.clone(),
            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Bang => "!".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::Comma => ",".to_string(),
            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
