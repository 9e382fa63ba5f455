//! Noyau : évaluation flottante (graphe seulement)
//!
//! tokenize -> RPN -> pile f64, avec une seule variable liée.
//!
//! Le solveur distant ne passe jamais par ici : ce module remplace la
//! « capacité d’évaluation externe » utilisée pour échantillonner le graphe.
//! Il accepte la notation du tampon (×, exposants, ^, **), pas la forme canonique.

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};
use thiserror::Error;

use super::jetons::tokenize;
use super::rpn::{to_rpn, Instr};

/// Borne des entiers acceptés par la combinatoire (anti-gel).
const COMBINATOIRE_MAX: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurEval {
    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),
    #[error("nombre invalide: {0}")]
    NombreInvalide(String),
    #[error("parenthèses non fermées")]
    ParenthesesNonFermees,
    #[error("parenthèse fermante sans ouvrante")]
    ParenthesesDesequilibrees,
    #[error("{0} attend une parenthèse")]
    ParentheseAttendue(String),
    #[error("expression invalide")]
    ExpressionInvalide,
    #[error("variable inconnue: {0}")]
    VariableInconnue(String),
    #[error("fonction inconnue: {0}")]
    FonctionInconnue(String),
    #[error("{fonction} attend {attendu} argument(s), reçu {recu}")]
    Arite {
        fonction: String,
        attendu: &'static str,
        recu: usize,
    },
    #[error("hors domaine: {0}")]
    Domaine(&'static str),
}

/// Capacité d’évaluation : texte + une variable liée -> nombre (ou échec).
pub trait Evaluateur {
    fn evaluer(&self, expression: &str, variable: &str, valeur: f64) -> Result<f64, ErreurEval>;
}

/// Évaluateur par défaut (f64, notation du tampon).
#[derive(Clone, Copy, Debug, Default)]
pub struct EvaluateurFlottant;

impl Evaluateur for EvaluateurFlottant {
    fn evaluer(&self, expression: &str, variable: &str, valeur: f64) -> Result<f64, ErreurEval> {
        let jetons = tokenize(expression)?;
        let rpn = to_rpn(&jetons)?;
        executer(&rpn, variable, valeur)
    }
}

/// Exécute une RPN sur une pile f64.
pub fn executer(rpn: &[Instr], variable: &str, valeur: f64) -> Result<f64, ErreurEval> {
    let mut st: Vec<f64> = Vec::new();

    for instr in rpn {
        match instr {
            Instr::Num(v) => st.push(*v),
            Instr::Atome(nom) => st.push(atome(nom, variable, valeur)?),

            Instr::Add | Instr::Sub | Instr::Mul | Instr::Div | Instr::Pow => {
                let b = st.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                let a = st.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                st.push(match instr {
                    Instr::Add => a + b,
                    Instr::Sub => a - b,
                    Instr::Mul => a * b,
                    Instr::Div => a / b,
                    _ => a.powf(b),
                });
            }

            Instr::Neg => {
                let a = st.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                st.push(-a);
            }
            Instr::Pourcent => {
                let a = st.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                st.push(a / 100.0);
            }
            Instr::Factorielle => {
                let a = st.pop().ok_or(ErreurEval::ExpressionInvalide)?;
                st.push(factorielle(a)?);
            }

            Instr::Appel(nom, arite) => {
                if st.len() < *arite {
                    return Err(ErreurEval::ExpressionInvalide);
                }
                let args = st.split_off(st.len() - arite);
                st.push(appeler(nom, &args)?);
            }
        }
    }

    if st.len() != 1 {
        return Err(ErreurEval::ExpressionInvalide);
    }
    st.pop().ok_or(ErreurEval::ExpressionInvalide)
}

fn atome(nom: &str, variable: &str, valeur: f64) -> Result<f64, ErreurEval> {
    if nom == variable {
        return Ok(valeur);
    }
    match nom {
        "pi" | "PI" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => Err(ErreurEval::VariableInconnue(nom.to_string())),
    }
}

fn unaire(nom: &str, args: &[f64]) -> Result<f64, ErreurEval> {
    match args {
        [x] => Ok(*x),
        _ => Err(ErreurEval::Arite {
            fonction: nom.to_string(),
            attendu: "1",
            recu: args.len(),
        }),
    }
}

fn binaire(nom: &str, args: &[f64]) -> Result<(f64, f64), ErreurEval> {
    match args {
        [a, b] => Ok((*a, *b)),
        _ => Err(ErreurEval::Arite {
            fonction: nom.to_string(),
            attendu: "2",
            recu: args.len(),
        }),
    }
}

fn appeler(nom: &str, args: &[f64]) -> Result<f64, ErreurEval> {
    // log accepte une base optionnelle : log(x) = ln(x), log(x, b)
    if nom == "log" && args.len() == 2 {
        return Ok(args[0].ln() / args[1].ln());
    }

    let v = match nom {
        "nPr" => {
            let (n, r) = binaire(nom, args)?;
            return permutations(n, r);
        }
        "nCr" => {
            let (n, r) = binaire(nom, args)?;
            return combinaisons(n, r);
        }
        "factorial" => return factorielle(unaire(nom, args)?),

        "sin" => unaire(nom, args)?.sin(),
        "cos" => unaire(nom, args)?.cos(),
        "tan" => unaire(nom, args)?.tan(),
        "asin" => unaire(nom, args)?.asin(),
        "acos" => unaire(nom, args)?.acos(),
        "atan" => unaire(nom, args)?.atan(),
        "sinh" => unaire(nom, args)?.sinh(),
        "cosh" => unaire(nom, args)?.cosh(),
        "tanh" => unaire(nom, args)?.tanh(),
        "sqrt" => unaire(nom, args)?.sqrt(),
        "abs" => unaire(nom, args)?.abs(),
        "exp" => unaire(nom, args)?.exp(),
        "ln" | "log" => unaire(nom, args)?.ln(),
        "log10" => unaire(nom, args)?.log10(),
        "log2" => unaire(nom, args)?.log2(),
        "floor" => unaire(nom, args)?.floor(),
        "ceil" => unaire(nom, args)?.ceil(),
        "round" => unaire(nom, args)?.round(),
        _ => return Err(ErreurEval::FonctionInconnue(nom.to_string())),
    };
    Ok(v)
}

/* ------------------------ Combinatoire exacte (BigInt) ------------------------ */

/// Entier naturel borné, sinon hors domaine.
fn entier_naturel(x: f64) -> Result<u64, ErreurEval> {
    if !x.is_finite() || x < 0.0 || x.fract() != 0.0 {
        return Err(ErreurEval::Domaine("entier naturel attendu"));
    }
    let n = x as u64;
    if n > COMBINATOIRE_MAX {
        return Err(ErreurEval::Domaine("entier trop grand"));
    }
    Ok(n)
}

/// Produit (bas..=haut) en BigInt ; 1 si intervalle vide.
fn produit(bas: u64, haut: u64) -> BigInt {
    let mut acc = BigInt::one();
    let mut k = bas.max(1);
    while k <= haut {
        acc *= k;
        k += 1;
    }
    acc
}

fn vers_f64(n: &BigInt) -> Result<f64, ErreurEval> {
    match n.to_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ErreurEval::Domaine("résultat trop grand")),
    }
}

fn factorielle(x: f64) -> Result<f64, ErreurEval> {
    let n = entier_naturel(x)?;
    vers_f64(&produit(1, n))
}

fn permutations(n: f64, r: f64) -> Result<f64, ErreurEval> {
    let (n, r) = (entier_naturel(n)?, entier_naturel(r)?);
    if r > n {
        return Err(ErreurEval::Domaine("r > n"));
    }
    vers_f64(&produit(n - r + 1, n))
}

fn combinaisons(n: f64, r: f64) -> Result<f64, ErreurEval> {
    let (n, r) = (entier_naturel(n)?, entier_naturel(r)?);
    if r > n {
        return Err(ErreurEval::Domaine("r > n"));
    }
    // C(n, r) = C(n, n-r) : on prend le plus petit des deux
    let r = r.min(n - r);
    vers_f64(&(produit(n - r + 1, n) / produit(1, r)))
}
