use super::common::{BoundingBox, GridPos};

pub struct Coin {
    pub pos: GridPos,
    pub taken: bool,
}

impl Coin {
    pub fn bb(&self, tile_size: f32, scale: f32) -> BoundingBox {
        let size = tile_size * scale;
        BoundingBox::new(
            self.pos.col as f32 * tile_size + (tile_size - size) * 0.5,
            self.pos.row as f32 * tile_size + (tile_size - size) * 0.5,
            size,
            size,
        )
    }
}

pub struct CoinSet {
    coins: Vec<Coin>,
}

impl CoinSet {
    pub fn from_grid(grid: &[Vec<bool>]) -> CoinSet {
        let coins = grid
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.iter()
                    .enumerate()
                    .filter(|(_, has_coin)| **has_coin)
                    .map(move |(col, _)| Coin {
                        pos: GridPos::new(row, col),
                        taken: false,
                    })
            })
            .collect();
        CoinSet { coins }
    }

    pub fn reset(&mut self) {
        for coin in &mut self.coins {
            coin.taken = false;
        }
    }

    pub fn collect_overlapping(
        &mut self,
        bb: &BoundingBox,
        tile_size: f32,
        scale: f32,
    ) -> Vec<GridPos> {
        let mut collected = vec![];
        for coin in self.coins.iter_mut().filter(|c| !c.taken) {
            if coin.bb(tile_size, scale).overlaps(bb) {
                coin.taken = true;
                collected.push(coin.pos);
            }
        }
        collected
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn taken_count(&self) -> usize {
        self.coins.iter().filter(|c| c.taken).count()
    }
}
