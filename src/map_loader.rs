use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use crate::types::{CellState, Grid};

/// Loads an ASCII ground-truth cave from a file.
///
/// # Format
/// - Each line is a row of the cave.
/// - '#' = Occupied, '.' = Free
/// - All lines must have the same length.
///
/// Returns a Grid or an io::Error.
pub fn load_cave_from_file(path: &str) -> io::Result<Grid> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
    if lines.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "Cave file is empty"));
    }
    let width = lines[0].len();
    let height = lines.len();
    if !lines.iter().all(|l| l.len() == width) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Inconsistent line lengths in cave file",
        ));
    }
    let mut cave = Grid::new(width, height, CellState::Free);
    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            let state = match ch {
                '#' => CellState::Occupied,
                '.' => CellState::Free,
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("Invalid cave character: {}", ch),
                    ))
                }
            };
            cave.set(x as i32, y as i32, state);
        }
    }
    Ok(cave)
}

/// Writes a cave as raw bytes: W*H row-major, 0 = free, 1 = occupied.
pub fn save_cave_bytes(path: &str, cave: &Grid) -> io::Result<()> {
    let mut bytes = Vec::with_capacity(cave.len());
    for i in 0..cave.len() {
        let cell = cave.unpack(i);
        bytes.push(match cave.cell(cell) {
            CellState::Occupied => 1u8,
            _ => 0u8,
        });
    }
    File::create(path)?.write_all(&bytes)
}

/// Reads a cave stored by [`save_cave_bytes`]. The dimensions are not part
/// of the format, so the caller supplies them.
pub fn load_cave_bytes(path: &str, width: usize, height: usize) -> io::Result<Grid> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    if bytes.len() != width * height {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Cave file holds {} cells, expected {}x{}",
                bytes.len(),
                width,
                height
            ),
        ));
    }
    let mut cave = Grid::new(width, height, CellState::Free);
    for (i, &byte) in bytes.iter().enumerate() {
        let cell = cave.unpack(i);
        let state = match byte {
            0 => CellState::Free,
            1 => CellState::Occupied,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid cell byte: {}", other),
                ))
            }
        };
        cave.set_cell(cell, state);
    }
    Ok(cave)
}
