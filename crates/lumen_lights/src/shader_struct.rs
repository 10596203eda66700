//! GLSL struct generation from a uniform descriptor.
//!
//! A descriptor lists uniforms as `<type><size> <name>` pairs, for example
//! `"float enabled float3 world_position"`. Pairs may be followed by any run
//! of `,`, `;` or `:`. Anything that does not look like a pair is skipped.
//!
//! ```text
//! float enabled float3 world_position
//!   ->
//! struct StructX {
//!    float enabled;
//!    vec3 world_position;
//! };
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// `<type><size> <name>` followed by optional separators.
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*([fFiI][loatn]+)([0-9]*)\s+([A-Za-z0-9_]+)[,;:]*")
        .expect("uniform descriptor pattern is valid")
});

/// One parsed `<type><size> <name>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformField {
    /// Type as written in the descriptor, without the size (`float`, `int`).
    pub base_type: String,
    /// Component count suffix exactly as written (`3` in `float3`).
    pub size: Option<String>,
    pub name: String,
}

impl UniformField {
    /// GLSL spelling: sized types become `vecN` / `ivecN`, unsized ones are kept.
    pub fn glsl_type(&self) -> String {
        match &self.size {
            Some(n) if self.base_type.starts_with(['i', 'I']) => format!("ivec{n}"),
            Some(n) => format!("vec{n}"),
            None => self.base_type.clone(),
        }
    }
}

/// Scans `descriptor` left to right and returns every entry in source order.
pub fn parse_uniform_descriptor(descriptor: &str) -> Vec<UniformField> {
    FIELD_PATTERN
        .captures_iter(descriptor)
        .map(|capture| UniformField {
            base_type: capture[1].to_string(),
            size: Some(&capture[2])
                .filter(|digits| !digits.is_empty())
                .map(str::to_string),
            name: capture[3].to_string(),
        })
        .collect()
}

/// Builds `struct Struct<name> { ... };` for the given descriptor.
pub fn generate_shader_struct(struct_name: &str, descriptor: &str) -> String {
    let body: String = parse_uniform_descriptor(descriptor)
        .iter()
        .map(|field| format!("   {} {};\n", field.glsl_type(), field.name))
        .collect();
    format!("struct Struct{struct_name} {{\n{body}}};\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(base_type: &str, size: Option<&str>, name: &str) -> UniformField {
        UniformField {
            base_type: base_type.into(),
            size: size.map(str::to_string),
            name: name.into(),
        }
    }

    #[test]
    fn scalar_then_vec3_in_order() {
        let out = generate_shader_struct("X", "float enabled float3 world_position");
        assert_eq!(
            out,
            "struct StructX {\n   float enabled;\n   vec3 world_position;\n};\n"
        );
    }

    #[test]
    fn empty_descriptor_gives_empty_body() {
        assert_eq!(generate_shader_struct("X", ""), "struct StructX {\n};\n");
        assert_eq!(generate_shader_struct("X", "   \n"), "struct StructX {\n};\n");
    }

    #[test]
    fn integer_vectors() {
        let fields = parse_uniform_descriptor("int2 tile Int4 mask int count");
        assert_eq!(
            fields.iter().map(UniformField::glsl_type).collect::<Vec<_>>(),
            vec!["ivec2", "ivec4", "int"]
        );
    }

    #[test]
    fn separators_are_consumed() {
        let fields = parse_uniform_descriptor("float a, float3 b; float4 c:: float d");
        assert_eq!(
            fields,
            vec![
                field("float", None, "a"),
                field("float", Some("3"), "b"),
                field("float", Some("4"), "c"),
                field("float", None, "d"),
            ]
        );
    }

    #[test]
    fn malformed_tokens_are_skipped() {
        let fields = parse_uniform_descriptor("mat4 model float3 ok bool flag float");
        assert_eq!(fields, vec![field("float", Some("3"), "ok")]);
    }

    #[test]
    fn type_may_start_inside_a_word() {
        // `xfloat2` is not a type, but the scan finds `float2` inside it.
        let fields = parse_uniform_descriptor("xfloat2 uv");
        assert_eq!(fields, vec![field("float", Some("2"), "uv")]);
    }

    #[test]
    fn tabs_and_newlines_separate_entries() {
        let fields = parse_uniform_descriptor("float\tenabled\nfloat3\tdir\n");
        assert_eq!(
            fields,
            vec![field("float", None, "enabled"), field("float", Some("3"), "dir")]
        );
    }

    #[test]
    fn size_digits_are_copied_verbatim() {
        let fields = parse_uniform_descriptor("float03 x int99999999999 y");
        assert_eq!(
            fields.iter().map(UniformField::glsl_type).collect::<Vec<_>>(),
            vec!["vec03", "ivec99999999999"]
        );
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        let fields = parse_uniform_descriptor("float é float3 pos ✓");
        assert_eq!(fields, vec![field("float", Some("3"), "pos")]);
    }

    #[test]
    fn generation_is_deterministic() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let alphabet = b"fFiIloatn0123456789 _,;:xyz\t";
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let descriptor: String = (0..len)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
                .collect();

            let out = generate_shader_struct("Fuzz", &descriptor);
            assert_eq!(out, generate_shader_struct("Fuzz", &descriptor));
            assert!(out.starts_with("struct StructFuzz {\n"));
            assert!(out.ends_with("};\n"));
            assert_eq!(
                out.lines().count(),
                parse_uniform_descriptor(&descriptor).len() + 2
            );
        }
    }
}
