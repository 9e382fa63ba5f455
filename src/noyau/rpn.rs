// src/noyau/rpn.rs
//
// Shunting-yard -> RPN
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), prête pour l’évaluation flottante
//
// Règles:
// - Ident(name) suivi de '(' et name ∈ est_fonction => appel (arité = nb de virgules + 1)
// - sinon Ident => atome (variable ou constante)
// - Moins unaire : opérateur préfixe `Neg`, plus fort que * et /, plus faible que ^
//   ("-2^2" = -4, "2^-1" = 0.5)
// - ! et % sont postfixés : ils s’appliquent tout de suite à la valeur qui précède

use super::eval::ErreurEval;
use super::jetons::{est_fonction, Tok};

/// Instruction RPN.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    Num(f64),
    Atome(String),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Factorielle,
    Pourcent,
    Appel(String, usize),
}

/// Élément de la pile d’opérateurs.
#[derive(Clone, Debug)]
enum Op {
    Binaire(Tok),
    Neg,
    Fonction(String),
    LPar,
}

fn precedence(op: &Op) -> i32 {
    match op {
        Op::Binaire(Tok::Plus | Tok::Minus) => 1,
        Op::Binaire(Tok::Star | Tok::Slash) => 2,
        Op::Neg => 3,
        Op::Binaire(Tok::Caret) => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

fn vers_instr(op: Op) -> Result<Instr, ErreurEval> {
    Ok(match op {
        Op::Binaire(Tok::Plus) => Instr::Add,
        Op::Binaire(Tok::Minus) => Instr::Sub,
        Op::Binaire(Tok::Star) => Instr::Mul,
        Op::Binaire(Tok::Slash) => Instr::Div,
        Op::Binaire(Tok::Caret) => Instr::Pow,
        Op::Neg => Instr::Neg,
        // une fonction sort avec sa parenthèse fermante, jamais ici
        Op::Fonction(_) | Op::LPar | Op::Binaire(_) => return Err(ErreurEval::ParenthesesNonFermees),
    })
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("nCr"), LPar, Num(5), Comma, Num(2), RPar, Plus, Ident("x")]
///   rpn:    [Num(5), Num(2), Appel("nCr", 2), Atome("x"), Add]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Instr>, ErreurEval> {
    let mut out: Vec<Instr> = Vec::new();
    let mut ops: Vec<Op> = Vec::new();

    // arité en cours, une entrée par '(' ouverte
    let mut arites: Vec<usize> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire.
    let mut prev_was_value = false;

    let mut iter = tokens.iter().peekable();
    while let Some(tok) = iter.next() {
        match tok {
            Tok::Num(v) => {
                out.push(Instr::Num(*v));
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if est_fonction(name) && matches!(iter.peek(), Some(Tok::LPar)) {
                    ops.push(Op::Fonction(name.clone()));
                    prev_was_value = false;
                } else if est_fonction(name) {
                    return Err(ErreurEval::ParentheseAttendue(name.clone()));
                } else {
                    out.push(Instr::Atome(name.clone()));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                ops.push(Op::LPar);
                arites.push(1);
                prev_was_value = false;
            }

            Tok::Comma => {
                depiler_jusqu_a_parenthese(&mut ops, &mut out)?;
                match arites.last_mut() {
                    Some(n) => *n += 1,
                    None => return Err(ErreurEval::ExpressionInvalide),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                depiler_jusqu_a_parenthese(&mut ops, &mut out)?;
                ops.pop(); // '('
                let arite = arites.pop().unwrap_or(1);

                // si une fonction est au sommet, on la sort avec son arité
                if let Some(Op::Fonction(_)) = ops.last() {
                    if let Some(Op::Fonction(name)) = ops.pop() {
                        out.push(Instr::Appel(name, arite));
                    }
                }

                prev_was_value = true;
            }

            Tok::Bang => out.push(Instr::Factorielle),
            Tok::Percent => out.push(Instr::Pourcent),

            Tok::Minus if !prev_was_value => {
                // préfixe : ne dépile rien
                ops.push(Op::Neg);
            }

            Tok::Plus if !prev_was_value => {
                // plus unaire : sans effet
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let nouveau = Op::Binaire(tok.clone());
                let p_tok = precedence(&nouveau);

                while let Some(top) = ops.last() {
                    if matches!(top, Op::LPar | Op::Fonction(_)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(vers_instr(op)?);
                    }
                }

                ops.push(nouveau);
                prev_was_value = false;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Op::LPar | Op::Fonction(_)) {
            return Err(ErreurEval::ParenthesesNonFermees);
        }
        out.push(vers_instr(op)?);
    }

    Ok(out)
}

/// Dépile jusqu’à '(' (exclue). Erreur si aucune '(' ouverte.
fn depiler_jusqu_a_parenthese(ops: &mut Vec<Op>, out: &mut Vec<Instr>) -> Result<(), ErreurEval> {
    loop {
        match ops.last() {
            Some(Op::LPar) => return Ok(()),
            Some(_) => {
                if let Some(op) = ops.pop() {
                    out.push(vers_instr(op)?);
                }
            }
            None => return Err(ErreurEval::ParenthesesDesequilibrees),
        }
    }
}
