use std::panic;

use zmark_core::convert;

const CASES: usize = 200;
const MAX_LEN: usize = 512;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 \
\n\n\n\t#####***[[]]:/.-_=\"!?";
const PLAIN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789 .,;:!?()\n\n\n\n";

#[test]
fn conversion_never_panics_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x7f4a_2d91_13b4_55a1);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_bytes(&mut rng, CHARSET, len);
        let result = panic::catch_unwind(|| convert(&source).map(|c| c.document.to_bytes()));
        match result {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                return Err(format!("conversion failed for case {}: {}", case, err).into());
            }
            Err(_) => {
                return Err(format!(
                    "conversion panicked for case {}: {:?}",
                    case,
                    String::from_utf8_lossy(&source)
                )
                .into());
            }
        }
    }
    Ok(())
}

#[test]
fn conversion_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x91d4_2f8e_c1a3_044f);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_bytes(&mut rng, CHARSET, len);
        let first = convert(&source)?.document.to_bytes();
        let second = convert(&source)?.document.to_bytes();
        if first != second {
            return Err(format!("output differs between runs for case {}", case).into());
        }
    }
    Ok(())
}

#[test]
fn plain_text_is_wrapped_paragraph_by_paragraph() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x2b7e_1516_28ae_d2a6);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_bytes(&mut rng, PLAIN_CHARSET, len);
        let text = String::from_utf8(source.clone())?;

        let mut expected = String::new();
        for block in text.split("\n\n") {
            let paragraph = block.replace('\n', "");
            if !paragraph.is_empty() {
                expected.push_str(&format!("<p>{}</p>\n", paragraph));
            }
        }

        let conversion = convert(&source)?;
        assert!(conversion.document.toc.is_empty());
        let actual = String::from_utf8(conversion.document.to_bytes())?;
        if actual != expected {
            return Err(format!(
                "paragraph mismatch for case {}\nSource:\n---\n{}\n---\nExpected:\n{}\nActual:\n{}",
                case, text, expected, actual
            )
            .into());
        }
    }
    Ok(())
}

#[test]
fn output_is_well_formed_markup() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x3c6e_f372_fe94_f82b);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_bytes(&mut rng, CHARSET, len);
        let html = String::from_utf8(convert(&source)?.document.to_bytes())?;
        let wrapped = format!("<root>{}</root>", html);
        if let Err(err) = roxmltree::Document::parse(&wrapped) {
            return Err(format!(
                "malformed output for case {}: {}\nSource:\n---\n{}\n---\nOutput:\n{}",
                case,
                err,
                String::from_utf8_lossy(&source),
                html
            )
            .into());
        }
    }
    Ok(())
}

#[test]
fn toc_ids_match_heading_ids() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0xa54f_f53a_5f1d_36f1);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_bytes(&mut rng, CHARSET, len);
        let conversion = convert(&source)?;
        let body = String::from_utf8(conversion.document.body.as_bytes().to_vec())?;

        for (idx, entry) in conversion.document.toc.entries().iter().enumerate() {
            assert_eq!(entry.id, idx + 1, "case {}", case);
            assert!((1..=6).contains(&entry.level), "case {}", case);
            let open = format!("<h{} id='{}'>", entry.level, entry.id);
            assert!(body.contains(&open), "case {}: missing {}", case, open);
        }
        assert_eq!(
            body.matches(" id='").count(),
            conversion.document.toc.len(),
            "case {}",
            case
        );
    }
    Ok(())
}

fn random_bytes(rng: &mut Lcg, charset: &[u8], len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| charset[rng.gen_range(0, charset.len())])
        .collect()
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = max - min;
        let value = (self.next() >> 1) as usize;
        min + (value % span)
    }
}
