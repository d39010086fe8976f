//! cb - Car Body Designer command line
//!
//! Creates design files, exports designs to STL and prints mesh statistics.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cb_core::{
    BoxSize, BuildOptions, CbConfig, Design, DesignStore, PanelSide, Parity, StorageModel,
    build_body, export_stl,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cb")]
#[command(about = "Car Body Designer mesh tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new box design to a designs file
    New {
        /// Design name
        name: String,

        /// Designs file, created if missing
        #[arg(short, long, default_value = "designs.json")]
        output: PathBuf,

        /// Lattice points as LENGTH,WIDTH,HEIGHT (default: 101,41,31)
        #[arg(long, value_parser = parse_size)]
        size: Option<BoxSize>,
    },

    /// Export a design to binary STL
    Export {
        /// Designs file
        input: PathBuf,

        /// Design name (default: first design)
        #[arg(short, long)]
        design: Option<String>,

        /// Output STL file (default: <design>.stl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include wheel cylinders
        #[arg(long)]
        wheels: bool,

        /// RON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print per-panel mesh statistics for a design
    Inspect {
        /// Designs file
        input: PathBuf,

        /// Design name (default: first design)
        #[arg(short, long)]
        design: Option<String>,
    },
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cb_cli=info,cb_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New { name, output, size } => new_design(&name, &output, size),
        Commands::Export {
            input,
            design,
            output,
            wheels,
            config,
        } => export(&input, design.as_deref(), output, wheels, config.as_deref()),
        Commands::Inspect { input, design } => inspect(&input, design.as_deref()),
    }
}

fn parse_size(value: &str) -> Result<BoxSize, String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<usize>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let [length, width, height] = parts[..] else {
        return Err(format!("expected LENGTH,WIDTH,HEIGHT, got {value:?}"));
    };
    let size = BoxSize::new(length, width, height);
    size.validate().map_err(|e| e.to_string())?;
    Ok(size)
}

fn load_store(path: &Path) -> Result<DesignStore> {
    DesignStore::load(path).with_context(|| format!("Failed to load designs from {}", path.display()))
}

/// Named design, or the store's active one
fn select_design<'a>(store: &'a DesignStore, name: Option<&str>) -> Result<&'a Design> {
    match name {
        Some(name) => store
            .get(name)
            .with_context(|| format!("No design named {name:?}")),
        None => match store.active() {
            Some(design) => Ok(design),
            None => bail!("The designs file contains no designs"),
        },
    }
}

fn new_design(name: &str, output: &Path, size: Option<BoxSize>) -> Result<()> {
    let mut store = if output.exists() {
        load_store(output)?
    } else {
        DesignStore::from_model(StorageModel::empty())
    };

    let design = Design::with_size(name, size.unwrap_or_default());
    if store.get(name).is_some() {
        tracing::warn!(design = name, "Replacing existing design");
    }
    store.update_design(design);
    store
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(design = name, path = %output.display(), "Saved design");
    Ok(())
}

fn export(
    input: &Path,
    name: Option<&str>,
    output: Option<PathBuf>,
    wheels: bool,
    config: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => CbConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CbConfig::default(),
    };
    let mut options = config.export;
    options.include_wheels |= wheels;

    let store = load_store(input)?;
    let design = select_design(&store, name)?;
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.stl", design.name)));

    export_stl(design, &options, &output)
        .with_context(|| format!("Failed to export {:?}", design.name))?;
    Ok(())
}

fn inspect(input: &Path, name: Option<&str>) -> Result<()> {
    let store = load_store(input)?;
    let design = select_design(&store, name)?;
    let model = build_body(design, Parity::All, &BuildOptions::preview())
        .with_context(|| format!("Failed to build {:?}", design.name))?;

    let BoxSize {
        length,
        width,
        height,
    } = design.box_size;
    println!("{} ({length} x {width} x {height} lattice points)", design.name);
    println!(
        "  wheels: {}, sections: {}",
        design.wheels.len(),
        design.front_segments.defined_count()
    );

    for side in PanelSide::ALL {
        let mesh = model.panel(side);
        println!(
            "  {:<8} {:>7} vertices {:>7} triangles",
            side.name(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    let bbox = model.bounding_box();
    println!("  total    {:>7} triangles", model.triangle_count());
    println!("  bounds   min {:?} max {:?}", bbox.min.to_array(), bbox.max.to_array());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("5, 3,4").unwrap(), BoxSize::new(5, 3, 4));
        assert!(parse_size("5,3").is_err());
        assert!(parse_size("5,x,3").is_err());
        assert!(parse_size("5,1,3").is_err());
    }

    #[test]
    fn test_select_design() {
        let mut store = DesignStore::from_model(StorageModel::empty());
        assert!(select_design(&store, None).is_err());

        store.update_design(Design::with_size("A", BoxSize::new(3, 3, 3)));
        store.update_design(Design::with_size("B", BoxSize::new(4, 3, 3)));
        assert_eq!(select_design(&store, Some("A")).unwrap().name, "A");
        assert_eq!(select_design(&store, None).unwrap().name, "B");
        assert!(select_design(&store, Some("C")).is_err());
    }

    #[test]
    fn test_new_then_export() {
        let dir = tempfile::tempdir().unwrap();
        let designs = dir.path().join("designs.json");
        let stl = dir.path().join("out.stl");

        new_design("Small", &designs, Some(BoxSize::new(5, 3, 3))).unwrap();
        new_design("Other", &designs, Some(BoxSize::new(4, 3, 3))).unwrap();
        assert_eq!(load_store(&designs).unwrap().designs().len(), 2);

        export(&designs, Some("Small"), Some(stl.clone()), false, None).unwrap();
        assert!(std::fs::metadata(&stl).unwrap().len() > 84);

        inspect(&designs, Some("Other")).unwrap();
        assert!(export(&designs, Some("Missing"), Some(stl), false, None).is_err());
    }
}
