// src/noyau/signe.rs
//
// Touche ± : inverse le signe du dernier terme du tampon.
//
// Règle (locale, non récursive, ancrée à droite) :
// - cible = plus longue suite finale de chiffres et de points, terminée par un chiffre
// - sinon, cible = tout le tampon
// - les '-' collés devant la cible forment son signe ; un '-' précédé d’un chiffre
//   ou d’un point (ex: "5-3") est une soustraction, il ne compte pas
// - nombre impair de '-' => on en retire un ; pair (ou zéro) => on en ajoute un
//
// La classe « soustraction » est exactement l’alphabet de la cible : un tel
// caractère ne peut jamais toucher la cible, donc ajouter ou retirer un '-' ne
// change ni la cible ni la lecture du premier '-'. Deux appuis = tampon d’origine.

/// Inverse le signe du terme final. Tampon vide => "-".
pub fn inverser_signe(tampon: &str) -> String {
    let chars: Vec<char> = tampon.chars().collect();

    // (j, nb_moins) : position du premier '-' de signe, et combien il y en a
    let (j, nb_moins) = match debut_nombre_final(&chars) {
        Some(debut) => {
            let mut j = debut;
            while j > 0 && chars[j - 1] == '-' {
                j -= 1;
            }
            let mut nb = debut - j;

            // "5-3" : le premier '-' est binaire, il reste en place
            if nb > 0 && j > 0 && est_du_nombre(chars[j - 1]) {
                j += 1;
                nb -= 1;
            }
            (j, nb)
        }
        // tout le tampon : ses '-' de tête
        None => (0, chars.iter().take_while(|&&c| c == '-').count()),
    };

    let mut out: Vec<char> = Vec::with_capacity(chars.len() + 1);
    out.extend_from_slice(&chars[..j]);
    if nb_moins % 2 == 1 {
        // retire un '-'
        out.extend_from_slice(&chars[j + 1..]);
    } else {
        out.push('-');
        out.extend_from_slice(&chars[j..]);
    }
    out.into_iter().collect()
}

/// Index du début de la suite numérique finale ("12", "1.5", ".5"), si elle existe.
fn debut_nombre_final(chars: &[char]) -> Option<usize> {
    if !chars.last().is_some_and(char::is_ascii_digit) {
        return None;
    }
    let mut i = chars.len();
    while i > 0 && est_du_nombre(chars[i - 1]) {
        i -= 1;
    }
    Some(i)
}

/// Alphabet de la suite numérique finale.
fn est_du_nombre(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}
