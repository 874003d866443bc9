//! hemesh CLI - half-edge mesh editing command-line tool.
//!
//! Usage: hemesh <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Meshes are read and written as JSON documents. Set `RUST_LOG=debug` to see
//! why an operation was not performed.
//!
//! Run `hemesh --help` for available commands.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use hemesh::io;
use hemesh::mesh::{HalfEdgeMesh, VertexId};
use hemesh::ops::{
    collapse_edge, delete_duplicate_vertices, flip_cycles, split_edge, swap_edge,
    trimesh_split_edge, CollapseOptions, SplitOptions, SwapOptions,
};

#[derive(Parser)]
#[command(name = "hemesh")]
#[command(author, version, about = "Half-edge mesh editing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Check the half-edge invariants of a mesh
    Validate {
        /// Input mesh file
        input: PathBuf,
    },

    /// Swap the edge shared by two triangles
    Swap {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// First edge vertex
        u: usize,

        /// Second edge vertex
        v: usize,

        /// Refuse edges touching the boundary
        #[arg(long)]
        no_boundary: bool,
    },

    /// Split an edge
    Split {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// First edge vertex
        u: usize,

        /// Second edge vertex
        v: usize,

        /// Position of the new vertex along the edge (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        t: f64,

        /// Allow boundary edges to be split
        #[arg(long)]
        allow_boundary: bool,

        /// Split adjacent triangles into triangles
        #[arg(long)]
        triangles: bool,
    },

    /// Collapse an edge, merging v into u
    Collapse {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Surviving vertex
        u: usize,

        /// Removed vertex
        v: usize,

        /// Where the surviving vertex ends up along the edge (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        t: f64,

        /// Allow edges touching the boundary to be collapsed
        #[arg(long)]
        allow_boundary: bool,

        /// Vertices that must not move
        #[arg(long, value_delimiter = ',')]
        fixed: Vec<usize>,
    },

    /// Merge vertices with coinciding coordinates
    Weld {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of decimals compared, at most 17
        #[arg(short, long, default_value = "3")]
        precision: usize,
    },

    /// Reverse the orientation of all faces
    Flip {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Validate { input } => {
            let mesh = io::load(&input)?;
            mesh.validate()?;
            println!("{}: valid", input.display());
        }

        Commands::Swap {
            input,
            output,
            u,
            v,
            no_boundary,
        } => {
            let mut mesh = io::load(&input)?;
            let options = SwapOptions::default().with_allow_boundary(!no_boundary);
            let result = swap_edge(&mut mesh, (VertexId::new(u), VertexId::new(v)), &options)?;
            report(result.map(|(a, b)| format!("new faces {} and {}", a, b)));
            save(&mesh, &output)?;
        }

        Commands::Split {
            input,
            output,
            u,
            v,
            t,
            allow_boundary,
            triangles,
        } => {
            let mut mesh = io::load(&input)?;
            let options = SplitOptions::default()
                .with_t(t)
                .with_allow_boundary(allow_boundary);
            let (u, v) = (VertexId::new(u), VertexId::new(v));
            let result = if triangles {
                trimesh_split_edge(&mut mesh, u, v, &options)?
            } else {
                split_edge(&mut mesh, u, v, &options)?
            };
            report(result.map(|w| format!("new vertex {}", w)));
            save(&mesh, &output)?;
        }

        Commands::Collapse {
            input,
            output,
            u,
            v,
            t,
            allow_boundary,
            fixed,
        } => {
            let mut mesh = io::load(&input)?;
            let options = CollapseOptions::default()
                .with_t(t)
                .with_allow_boundary(allow_boundary)
                .with_fixed(fixed.into_iter().map(VertexId::new));
            let result = collapse_edge(&mut mesh, VertexId::new(u), VertexId::new(v), &options)?;
            report(result.map(|u| format!("kept vertex {}", u)));
            save(&mesh, &output)?;
        }

        Commands::Weld {
            input,
            output,
            precision,
        } => {
            let mut mesh = io::load(&input)?;
            let result = delete_duplicate_vertices(&mut mesh, precision)?;
            report(result.map(|n| format!("removed {} vertices", n)));
            save(&mesh, &output)?;
        }

        Commands::Flip { input, output } => {
            let mut mesh = io::load(&input)?;
            flip_cycles(&mut mesh)?;
            println!("Flipped {} faces", mesh.num_faces());
            save(&mesh, &output)?;
        }
    }

    Ok(())
}

fn report(outcome: Option<String>) {
    match outcome {
        Some(message) => println!("Done: {}", message),
        None => println!("Not performed (run with RUST_LOG=debug for the reason)"),
    }
}

fn save(mesh: &HalfEdgeMesh, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    io::save(mesh, output)?;
    println!("Saved to {}", output.display());
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", mesh.num_edges());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    let boundaries = mesh.boundaries();
    if boundaries.is_empty() {
        println!("Boundary: closed");
    } else {
        let lengths: Vec<usize> = boundaries.iter().map(Vec::len).collect();
        println!("Boundary loops: {} (lengths {:?})", boundaries.len(), lengths);
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else {
        let max_degree = mesh.faces().map(|(_, f)| f.degree()).max().unwrap_or(0);
        println!("Mesh type: Polygon mesh (max face degree {})", max_degree);
    }

    let non_manifold = mesh
        .vertex_ids()
        .filter(|&v| !mesh.is_manifold_vertex(v))
        .count();
    if non_manifold > 0 {
        println!("Non-manifold vertices: {}", non_manifold);
    }

    let allocator = mesh.allocator();
    println!(
        "Next ids: vertex {}, face {}",
        allocator.peek_vertex_id(),
        allocator.peek_face_id()
    );

    match mesh.validate() {
        Ok(()) => println!("Valid: yes"),
        Err(e) => println!("Valid: no ({})", e),
    }

    Ok(())
}
