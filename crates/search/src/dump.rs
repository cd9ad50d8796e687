use std::io::Write;
use std::path::Path;

use crystal_graph::Lattice;
use crystal_utilities::CrystalError;

use crate::search::level_size;
use crate::Subset;

/// The flags that get folded into a dump file's name, mirroring the configuration that
/// produced the crystals inside it.
#[derive(Clone, Copy, Debug)]
pub struct DumpFlags {
    pub bidi: bool,
    pub translation_invariant: bool,
    pub require_energy: Option<u64>,
    pub seed_size: usize,
}

/// `Crystals in <d>d with <n> atoms (mode: <flags>).txt`, `<flags>` being the
/// concatenation of `b`, `t`, `E<R>` and `i<k>` as each applies.
pub fn filename(dimension: usize, size: usize, flags: &DumpFlags) -> String {
    let mut mode = String::new();
    if flags.bidi {
        mode.push('b');
    }
    if flags.translation_invariant {
        mode.push('t');
    }
    if let Some(r) = flags.require_energy {
        mode.push_str(&format!("E{r}"));
    }
    if flags.seed_size > 0 {
        mode.push_str(&format!("i{}", flags.seed_size));
    }
    format!("Crystals in {dimension}d with {size} atoms (mode: {mode}).txt")
}

/// `[(i1,1, ..., i1,d), ...]`, vertices in the subset's sorted order. `[]` for the
/// empty crystal.
pub fn render_crystal(subset: &Subset, lattice: &Lattice) -> String {
    let vertices = subset.iter_sorted(lattice);
    let parts: Vec<String> = vertices
        .into_iter()
        .map(|key| {
            let coords: Vec<String> = lattice.vector_of(key).iter().map(i64::to_string).collect();
            format!("({})", coords.join(", "))
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Writes one file per collected level of `crystals` under `dir`, skipping (and
/// `log::error!`-reporting) any size whose target file already exists.
///
/// `seed_size`/`growing` recover each level's actual population the same way
/// `SearchResult` does: level `d` is `seed_size + d` while growing, `seed_size - d`
/// while shrinking; it is *not* `lower + d` in the shrinking case.
pub fn dump_to_directory(
    dir: &Path,
    dimension: usize,
    lattice: &Lattice,
    seed_size: usize,
    growing: bool,
    crystals: &[Vec<Subset>],
    flags: &DumpFlags,
) -> Result<(), CrystalError> {
    for (d, level) in crystals.iter().enumerate() {
        let size = level_size(seed_size, growing, d);
        let path = dir.join(filename(dimension, size, flags));

        if path.exists() {
            let err = CrystalError::DumpCollision(path.clone());
            log::error!("{err}, skipping size {size}");
            continue;
        }

        let mut body = String::new();
        for crystal in level {
            body.push_str(&render_crystal(crystal, lattice));
            body.push('\n');
        }

        std::fs::write(&path, body)
            .map_err(|e| CrystalError::ResourceExhausted(format!("writing dump file {}: {e}", path.display())))?;
    }

    Ok(())
}

/// Writes every collected level of `crystals` to a single stream, one `# <size> atoms`
/// header line followed by its crystal records. Used for the stdout-sigil dump
/// destination, where per-size files aren't available.
pub fn dump_to_writer(
    writer: &mut impl Write,
    dimension: usize,
    lattice: &Lattice,
    seed_size: usize,
    growing: bool,
    crystals: &[Vec<Subset>],
) -> Result<(), CrystalError> {
    for (d, level) in crystals.iter().enumerate() {
        let size = level_size(seed_size, growing, d);
        writeln!(writer, "# {dimension}d, {size} atoms")
            .map_err(|e| CrystalError::ResourceExhausted(format!("writing crystal dump: {e}")))?;
        for crystal in level {
            writeln!(writer, "{}", render_crystal(crystal, lattice))
                .map_err(|e| CrystalError::ResourceExhausted(format!("writing crystal dump: {e}")))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crystal_graph::UniformNeighborhood;

    use super::*;

    fn flags() -> DumpFlags {
        DumpFlags { bidi: true, translation_invariant: true, require_energy: None, seed_size: 0 }
    }

    #[test]
    fn test_filename_encodes_dimension_size_and_flags() {
        let name = filename(2, 4, &flags());
        assert_eq!(name, "Crystals in 2d with 4 atoms (mode: bt).txt");
    }

    #[test]
    fn test_filename_with_require_energy_and_seed_size() {
        let mut f = flags();
        f.bidi = false;
        f.require_energy = Some(3);
        f.seed_size = 5;
        assert_eq!(filename(2, 4, &f), "Crystals in 2d with 4 atoms (mode: tE3i5).txt");
    }

    #[test]
    fn test_render_empty_crystal() {
        let lattice = Lattice::new(UniformNeighborhood::square());
        assert_eq!(render_crystal(&Subset::empty(), &lattice), "[]");
    }

    #[test]
    fn test_render_crystal_sorts_vertices() {
        let mut lattice = Lattice::new(UniformNeighborhood::square());
        let a = lattice.intern(vec![1, 0]);
        let b = lattice.intern(vec![0, 0]);
        let subset = Subset::of([a, b]);
        assert_eq!(render_crystal(&subset, &lattice), "[(0, 0), (1, 0)]");
    }

    #[test]
    fn test_dump_writes_one_file_per_level() {
        let mut lattice = Lattice::new(UniformNeighborhood::square());
        let origin = lattice.intern(vec![0, 0]);
        let crystals = vec![vec![Subset::empty()], vec![Subset::of([origin])]];

        let dir = tempfile::tempdir().unwrap();
        dump_to_directory(dir.path(), 2, &lattice, 0, true, &crystals, &flags()).unwrap();

        assert!(dir.path().join(filename(2, 0, &flags())).exists());
        assert!(dir.path().join(filename(2, 1, &flags())).exists());
    }

    #[test]
    fn test_dump_skips_existing_file_without_failing() {
        let lattice = Lattice::new(UniformNeighborhood::square());
        let crystals = vec![vec![Subset::empty()]];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(filename(2, 0, &flags()));
        std::fs::write(&path, "pre-existing").unwrap();

        dump_to_directory(dir.path(), 2, &lattice, 0, true, &crystals, &flags()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pre-existing");
    }

    #[test]
    fn test_dump_to_writer_emits_a_header_per_level() {
        let mut lattice = Lattice::new(UniformNeighborhood::square());
        let origin = lattice.intern(vec![0, 0]);
        let crystals = vec![vec![Subset::empty()], vec![Subset::of([origin])]];

        let mut buffer = Vec::new();
        dump_to_writer(&mut buffer, 2, &lattice, 0, true, &crystals).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# 2d, 0 atoms"));
        assert!(text.contains("# 2d, 1 atoms"));
        assert!(text.contains("[(0, 0)]"));
    }

    #[test]
    fn test_dump_labels_shrinking_levels_by_actual_population_not_lower_plus_d() {
        let mut lattice = Lattice::new(UniformNeighborhood::square());
        let a = lattice.intern(vec![0, 0]);
        let b = lattice.intern(vec![1, 0]);

        // seed_size=2, growing=false: d=0 is population 2, d=1 is population 1.
        let crystals = vec![vec![Subset::of([a, b])], vec![Subset::of([a])]];

        let mut buffer = Vec::new();
        dump_to_writer(&mut buffer, 2, &lattice, 2, false, &crystals).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# 2d, 2 atoms"));
        assert!(text.contains("# 2d, 1 atoms"));
        assert!(!text.contains("# 2d, 0 atoms"));
    }
}
