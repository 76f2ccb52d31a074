//! Hashed TF-IDF provider.
//!
//! Deterministic dense vectors from hashed unigrams and adjacent bigrams.
//! Bigrams keep "section 17" and "section 170" apart. Always available.

use std::collections::HashMap;

use precedent_core::errors::PrecedentResult;
use precedent_core::traits::IEmbeddingProvider;

pub const PROVIDER_NAME: &str = "hashed-tfidf";

pub struct HashedTfIdf {
    dimensions: usize,
}

impl HashedTfIdf {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    /// Lowercase alphanumeric terms. Numbers are kept whatever their length;
    /// single letters are dropped.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() >= 2 || s.chars().all(|c| c.is_ascii_digit()))
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }
        for pair in tokens.windows(2) {
            *tf.entry(format!("{} {}", pair[0], pair[1])).or_default() += 0.5;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            // Longer terms carry more information than short function words.
            let idf = 1.0 + (term.len() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += (count / total) * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashedTfIdf {
    fn embed(&self, text: &str) -> PrecedentResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> PrecedentResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine;

    #[test]
    fn empty_text_is_zero_vector() {
        let v = HashedTfIdf::new(64).embed("").unwrap();
        assert_eq!(v.len(), 64);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn unit_norm_and_deterministic() {
        let p = HashedTfIdf::new(256);
        let a = p.embed("registration of documents is compulsory").unwrap();
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(a, p.embed("registration of documents is compulsory").unwrap());
    }

    #[test]
    fn keeps_section_numbers() {
        let tokens = HashedTfIdf::tokenize("Section 17(1)(b) of the Act");
        assert!(tokens.contains(&"17".to_string()));
        assert!(tokens.contains(&"1".to_string()));
        assert!(!tokens.contains(&"b".to_string()));
    }

    #[test]
    fn related_text_scores_higher() {
        let p = HashedTfIdf::new(256);
        let q = p.embed("compulsory registration of documents").unwrap();
        let near = p.embed("documents of which registration is compulsory").unwrap();
        let far = p.embed("income tax assessment of partnership firms").unwrap();
        assert!(cosine(&q, &near) > cosine(&q, &far));
    }
}
