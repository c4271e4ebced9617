use matrix_strategies::{
    MapReduceMultiplication, Matrix, MultiplyStrategy, ParallelMultiplication,
    SequentialMultiplication,
};

fn main() {
    println!("Matrix Multiplication Strategies - Basic Example\n");

    let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();

    println!("Matrix A (2x2):");
    print_matrix(&a);

    println!("\nMatrix B (2x2):");
    print_matrix(&b);

    let strategies: Vec<(&str, Box<dyn MultiplyStrategy<f64>>)> = vec![
        ("sequential", Box::new(SequentialMultiplication)),
        ("parallel", Box::new(ParallelMultiplication::new(4).unwrap())),
        ("mapreduce", Box::new(MapReduceMultiplication)),
    ];

    for (name, strategy) in &strategies {
        let c = strategy.multiply(&a, &b).unwrap();
        println!("\nC = A x B via {name}:");
        print_matrix(&c);
    }
}

fn print_matrix(m: &Matrix<f64>) {
    for i in 0..m.rows {
        let row: Vec<String> = (0..m.cols)
            .map(|j| format!("{:6.1}", m.get(i, j).unwrap()))
            .collect();
        println!("  [{}]", row.join(", "));
    }
}
